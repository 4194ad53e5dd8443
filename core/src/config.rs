//! Loading JSON configuration and layout files.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reads and parses a JSON file. Types with `#[serde(default)]` keep
/// their defaults for missing fields.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::economy::EconomyConfig;

    #[test]
    fn test_load_partial_economy() {
        let path = std::env::temp_dir().join("cooldown-core-economy.json");
        std::fs::write(&path, r#"{"max_energy": 40.0}"#).unwrap();

        let config: EconomyConfig = load_json(&path).unwrap();
        assert_eq!(config.max_energy, 40.0);
        assert_eq!(config.tick_interval_ms, 100);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_errors_are_classified() {
        let missing = std::env::temp_dir().join("cooldown-core-does-not-exist.json");
        assert!(matches!(
            load_json::<EconomyConfig>(&missing),
            Err(ConfigError::Io(_))
        ));

        let broken = std::env::temp_dir().join("cooldown-core-broken-layout.json");
        std::fs::write(&broken, "[[null]]").unwrap();
        assert!(matches!(load_json::<Board>(&broken), Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_file(broken);
    }
}
