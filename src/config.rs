use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub json: Option<PathBuf>,
    #[serde(default)]
    pub csv: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["mp3", "wav", "ogg", "m4a", "flac", "aac", "wma", "aiff", "alac"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_full_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.scan.extensions.iter().any(|e| e == "mp3"));
        assert!(config.scan.extensions.iter().any(|e| e == "flac"));
        assert_eq!(config.export.json, None);
    }

    #[test]
    fn partial_sections_keep_per_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [export]
            json = "library.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.json, Some(PathBuf::from("library.json")));
        assert_eq!(config.export.csv, None);
        assert!(!config.scan.extensions.is_empty());
    }

    #[test]
    fn extension_list_can_be_narrowed() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            extensions = ["flac"]
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.extensions, vec!["flac".to_string()]);
    }
}
