use std::{env, path::PathBuf};

const DEFAULT_INPUT: &str = "data/bot.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub pretty: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_sources(
            env::args().nth(1),
            env::var("BOT_METRICS_INPUT").ok(),
            env::var("BOT_METRICS_PRETTY").ok(),
        )
    }

    /// An explicit argument wins over the environment.
    pub fn from_sources(
        arg: Option<String>,
        input_var: Option<String>,
        pretty_var: Option<String>,
    ) -> Self {
        let input_path = arg
            .filter(|value| !value.trim().is_empty())
            .or(input_var.filter(|value| !value.trim().is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        Self {
            input_path,
            pretty: pretty_var.as_deref().is_some_and(is_truthy),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_overrides_env_path() {
        let config = Config::from_sources(
            Some("bots/7.json".to_string()),
            Some("ignored.json".to_string()),
            None,
        );
        assert_eq!(config.input_path, PathBuf::from("bots/7.json"));
        assert!(!config.pretty);
    }

    #[test]
    fn falls_back_to_env_then_default() {
        let from_env = Config::from_sources(None, Some("env.json".to_string()), None);
        assert_eq!(from_env.input_path, PathBuf::from("env.json"));

        let blank = Config::from_sources(None, Some("  ".to_string()), None);
        assert_eq!(blank.input_path, PathBuf::from(DEFAULT_INPUT));
    }

    #[test]
    fn pretty_flag_accepts_common_spellings() {
        for value in ["1", "true", "YES", " True "] {
            assert!(Config::from_sources(None, None, Some(value.to_string())).pretty);
        }
        assert!(!Config::from_sources(None, None, Some("0".to_string())).pretty);
    }
}
