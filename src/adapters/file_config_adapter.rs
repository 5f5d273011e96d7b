//! INI file configuration adapter.

use crate::domain::error::TrendguardError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// `configparser`-backed settings. Section and key names are case-insensitive,
/// so `[asset.USAe]` is found under any spelling.
#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrendguardError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TrendguardError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TrendguardError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TrendguardError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// No sections at all; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
source = csv
csv_dir = ./prices

[simulation]
years = 35
assets = USAe,JapH
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "source"), Some("csv".to_string()));
        assert_eq!(
            adapter.get_string("simulation", "assets"),
            Some("USAe,JapH".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = yahoo\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn section_lookup_ignores_case() {
        let adapter = FileConfigAdapter::from_string("[asset.USAe]\nposition = 5256\n").unwrap();
        assert_eq!(
            adapter.get_string("asset.USAe", "position"),
            Some("5256".to_string())
        );
        assert_eq!(
            adapter.get_string("ASSET.usae", "POSITION"),
            Some("5256".to_string())
        );
    }

    #[test]
    fn numeric_values_are_returned_raw() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ntax_rate = not_a_number\n").unwrap();
        assert_eq!(
            adapter.get_string("simulation", "tax_rate"),
            Some("not_a_number".to_string())
        );
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[chart]\na = true\nb = yes\nc = On\n").unwrap();
        assert!(adapter.get_bool("chart", "a", false));
        assert!(adapter.get_bool("chart", "b", false));
        assert!(adapter.get_bool("chart", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[chart]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("chart", "a", true));
        assert!(!adapter.get_bool("chart", "b", true));
        assert!(!adapter.get_bool("chart", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[chart]\n").unwrap();
        assert!(adapter.get_bool("chart", "enabled", true));
        assert!(!adapter.get_bool("chart", "enabled", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[chart]\noutput_dir = /tmp/charts\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("chart", "output_dir"),
            Some("/tmp/charts".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            TrendguardError::ConfigParse { ref file, .. } if file == "/nonexistent/path/config.ini"
        ));
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("data", "source"), None);
        assert!(adapter.get_bool("chart", "enabled", true));
    }
}
