pub mod storage;
pub mod types;

pub use storage::{backup_path, get_state_path, load_or_empty, load_snapshot, save_snapshot};
pub use types::{ClassSnapshot, Snapshot, SNAPSHOT_VERSION};
