use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Presentation settings for the command-line report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputFormat,
    /// List the distinct hosts behind the extracted URLs
    pub show_link_hosts: bool,
    /// Include the advisory risk signals
    pub show_signals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output: OutputFormat::Text,
            show_link_hosts: true,
            show_signals: true,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("output: json\n").unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.show_link_hosts);
        assert!(config.show_signals);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("phishguard-config-{}.yaml", std::process::id()));
        let path = path.to_str().unwrap();

        let config = Config {
            output: OutputFormat::Json,
            show_link_hosts: false,
            show_signals: true,
        };
        config.to_file(path).unwrap();
        let loaded = Config::from_file(path).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file("/nonexistent/phishguard.yaml").is_err());
    }
}
