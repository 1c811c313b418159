use pigeon_db::config::parse_var;
use pigeon_db::{ConfigurationError, StoreConfig};

pub const DEFAULT_RESULTS_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub default_results_limit: u32,
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("PIGEON_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_var(&lookup, "PIGEON_PORT", 3000)?;

        let default_results_limit: u32 =
            parse_var(&lookup, "PIGEON_DEFAULT_RESULTS_LIMIT", DEFAULT_RESULTS_LIMIT)?;
        if default_results_limit == 0 {
            return Err(ConfigurationError::Invalid {
                key: "PIGEON_DEFAULT_RESULTS_LIMIT",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            host,
            port,
            default_results_limit,
            store: StoreConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_results_limit, DEFAULT_RESULTS_LIMIT);
        assert_eq!(config.store, StoreConfig::from_lookup(|_| None).unwrap());
    }

    #[test]
    fn reads_limit() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "PIGEON_DEFAULT_RESULTS_LIMIT").then(|| "25".to_string())
        })
        .unwrap();
        assert_eq!(config.default_results_limit, 25);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = ServerConfig::from_lookup(|key| {
            (key == "PIGEON_DEFAULT_RESULTS_LIMIT").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid { key: "PIGEON_DEFAULT_RESULTS_LIMIT", .. }));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(|key| (key == "PIGEON_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid { key: "PIGEON_PORT", .. }));
    }
}
