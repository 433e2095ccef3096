// Copyright(C) Mundis.
use {
    crate::{read_json, ChainParameters, ConfigError},
    mundis_model::{
        base_types::{ChainId, UnixTimestamp},
        codec,
    },
    serde::{Deserialize, Serialize},
    std::{
        path::Path,
        time::{SystemTime, UNIX_EPOCH},
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisConfig {
    /// when the network (bootstrap validator) was started relative to the UNIX Epoch
    pub creation_time: UnixTimestamp,
    pub chain_name: String,
    pub parameters: ChainParameters,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            creation_time: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            chain_name: "local".to_string(),
            parameters: ChainParameters::default(),
        }
    }
}

impl GenesisConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let genesis: Self = read_json(path.as_ref())?;
        genesis.parameters.validate()?;
        Ok(genesis)
    }

    /// The chain id every signature on this chain is bound to.
    pub fn chain_id(&self) -> ChainId {
        codec::digest(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis(name: &str) -> GenesisConfig {
        GenesisConfig {
            creation_time: 1_600_000_000,
            chain_name: name.to_string(),
            parameters: ChainParameters::default(),
        }
    }

    #[test]
    fn chain_id_is_a_pure_function_of_genesis() {
        assert_eq!(genesis("main").chain_id(), genesis("main").chain_id());
        assert_ne!(genesis("main").chain_id(), genesis("test").chain_id());

        let mut tweaked = genesis("main");
        tweaked.parameters.max_apply_depth += 1;
        assert_ne!(tweaked.chain_id(), genesis("main").chain_id());
    }

    #[test]
    fn load_from_json() {
        let path = std::env::temp_dir().join("mundis_genesis_test.json");
        std::fs::write(
            &path,
            r#"{ "creation_time": 1600000000, "chain_name": "main", "parameters": {} }"#,
        )
        .unwrap();
        let loaded = GenesisConfig::load(&path).unwrap();
        assert_eq!(loaded, genesis("main"));
        let _ = std::fs::remove_file(&path);
    }
}
