use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional settings file.
///
/// Example YAML:
/// ```yaml
/// state_file: ~/wettkampf/competition.json
/// log_level: info
/// colors: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the competition snapshot lives (default: ~/.config/climb-score/competition.json)
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// trace, debug, info, warn or error (default: warn)
    #[serde(default)]
    pub log_level: Option<String>,

    /// Force colored tables on or off (default: on when stdout is a terminal)
    #[serde(default)]
    pub colors: Option<bool>,
}

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// The configured state file with a leading `~/` expanded, or the default path
    pub fn state_path(&self) -> PathBuf {
        match &self.state_file {
            Some(path) => expand_home(path),
            None => crate::state::get_state_path(),
        }
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref level) = config.log_level {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            errors.push(format!(
                "log_level: invalid '{}' - expected one of {}",
                level,
                LOG_LEVELS.join(", ")
            ));
        }
    }

    if let Some(ref path) = config.state_file {
        if path.as_os_str().is_empty() {
            errors.push("state_file: must not be empty".to_string());
        } else if config.state_path().is_dir() {
            errors.push(format!(
                "state_file: '{}' is a directory",
                path.display()
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
state_file: /tmp/wettkampf.json
log_level: debug
colors: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/wettkampf.json")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.colors, Some(false));
        assert_eq!(config.state_path(), PathBuf::from("/tmp/wettkampf.json"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "state_fiel: /tmp/x.json\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_default_state_path() {
        let path = Config::default().state_path();
        assert!(path.ends_with("climb-score/competition.json"));
    }

    #[test]
    fn test_home_expansion() {
        let config = Config {
            state_file: Some(PathBuf::from("~/comp.json")),
            ..Config::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.state_path(), home.join("comp.json"));
        }
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let dir = std::env::temp_dir();
        let config = Config {
            state_file: Some(dir),
            log_level: Some("loud".to_string()),
            colors: None,
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("log_level"));
        assert!(errors[1].contains("is a directory"));
    }

    #[test]
    fn test_validate_expands_home_before_directory_check() {
        let config = Config {
            state_file: Some(PathBuf::from("~")),
            ..Config::default()
        };
        if dirs::home_dir().is_some_and(|home| home.is_dir()) {
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("'~' is a directory"));
        }
    }

    #[test]
    fn test_validate_accepts_uppercase_level() {
        let config = Config {
            log_level: Some("INFO".to_string()),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
