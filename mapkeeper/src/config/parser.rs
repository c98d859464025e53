//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = non_empty(section.get("regions_file")) {
            config.catalog.regions_file = Some(expand_tilde(v));
        }
        if let Some(v) = non_empty(section.get("state_file")) {
            config.catalog.state_file = Some(expand_tilde(v));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            if v.contains('/') || v.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    section: "logging".to_string(),
                    key: "file".to_string(),
                    value: v.to_string(),
                    reason: "must be a file name, not a path".to_string(),
                });
            }
            config.logging.file = v.to_string();
        }
        if let Some(v) = non_empty(section.get("level")) {
            config.logging.level = v.to_string();
        }
    }

    // [layout] section
    if let Some(section) = ini.section(Some("layout")) {
        if let Some(v) = section.get("verify_invariants") {
            config.layout.verify_invariants =
                parse_bool(v).ok_or_else(|| ConfigError::InvalidValue {
                    section: "layout".to_string(),
                    key: "verify_invariants".to_string(),
                    value: v.to_string(),
                    reason: "must be true or false".to_string(),
                })?;
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a boolean config value.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<ConfigFile, ConfigError> {
        let ini = Ini::load_from_str(source).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_invalid_verify_invariants() {
        let result = parse("[layout]\nverify_invariants = sometimes\n");

        match result {
            Err(ConfigError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "layout");
                assert_eq!(key, "verify_invariants");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_log_file_must_be_a_name() {
        let result = parse("[logging]\nfile = logs/mapkeeper.log\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config = parse("[catalog]\nregions_file =\n[logging]\nlevel =  \n").unwrap();

        assert!(config.catalog.regions_file.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("OFF"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/maps"), home.join("maps"));
        }
    }
}
