pub mod formatter;
pub mod runsheet;

pub use formatter::{
    format_class_results, format_results_tsv, format_speed_ranking, format_speed_tsv,
    format_team_detail, format_team_ranking, should_use_colors,
};
pub use runsheet::{format_run_sheet, format_run_sheets};
