// Copyright(C) Mundis.
use {
    serde::{de::DeserializeOwned, Deserialize, Serialize},
    std::{fs, path::Path},
    thiserror::Error,
};

pub mod genesis;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Invalid chain parameter: {0}")]
    Invalid(String),
}

/// Limits applied while validating and applying transactions. All nodes of a chain must
/// agree on these values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChainParameters {
    /// How far past the head block time a transaction may expire, in seconds.
    pub max_transaction_lifetime: u64,
    /// Deepest chain of notifications and inline messages one message may trigger.
    pub max_apply_depth: u16,
    /// Most transactions a single message application may defer.
    pub max_deferred_per_message: u16,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            max_transaction_lifetime: 60 * 60,
            max_apply_depth: 6,
            max_deferred_per_message: 16,
        }
    }
}

impl ChainParameters {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let parameters: Self = read_json(path.as_ref())?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transaction_lifetime == 0 {
            return Err(ConfigError::Invalid(
                "max_transaction_lifetime must be positive".to_string(),
            ));
        }
        if self.max_apply_depth == 0 {
            return Err(ConfigError::Invalid("max_apply_depth must be positive".to_string()));
        }
        if self.max_deferred_per_message == 0 {
            return Err(ConfigError::Invalid(
                "max_deferred_per_message must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    let data = fs::read(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let parameters: ChainParameters =
            serde_json::from_str(r#"{ "max_apply_depth": 3 }"#).unwrap();
        assert_eq!(parameters.max_apply_depth, 3);
        assert_eq!(parameters.max_transaction_lifetime, 3600);
        assert_eq!(parameters.max_deferred_per_message, 16);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(ChainParameters::default().validate().is_ok());
        let zeroed: [fn(&mut ChainParameters); 3] = [
            |p| p.max_transaction_lifetime = 0,
            |p| p.max_apply_depth = 0,
            |p| p.max_deferred_per_message = 0,
        ];
        for zero in zeroed {
            let mut parameters = ChainParameters::default();
            zero(&mut parameters);
            assert!(
                matches!(parameters.validate(), Err(ConfigError::Invalid(_))),
                "{:?}",
                parameters
            );
        }
    }

    #[test]
    fn load_reports_path_on_failure() {
        let path = std::env::temp_dir().join("mundis_chain_parameters_missing.json");
        let _ = fs::remove_file(&path);
        match ChainParameters::load(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert!(p.ends_with(".json")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn load_round_trip() {
        let path = std::env::temp_dir().join("mundis_chain_parameters_test.json");
        let parameters = ChainParameters {
            max_transaction_lifetime: 120,
            max_apply_depth: 2,
            max_deferred_per_message: 1,
        };
        fs::write(&path, serde_json::to_vec(&parameters).unwrap()).unwrap();
        assert_eq!(ChainParameters::load(&path).unwrap(), parameters);
        let _ = fs::remove_file(&path);
    }
}
