use std::env;

use sqlx::postgres::PgConnectOptions;

/// Which session backend the service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub db_max_connections: u32,
    pub store: StoreKind,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default.into())
        };

        Ok(Self {
            postgres_host: var("POSTGRES_HOST", "localhost"),
            postgres_port: parse("POSTGRES_PORT", &var("POSTGRES_PORT", "5432"))?,
            postgres_db: var("POSTGRES_DB", ""),
            postgres_user: var("POSTGRES_USER", ""),
            postgres_password: var("POSTGRES_PASSWORD", ""),
            db_max_connections: parse("DB_MAX_CONNECTIONS", &var("DB_MAX_CONNECTIONS", "20"))?,
            store: match var("ANN_STORE", "postgres").to_lowercase().as_str() {
                "postgres" => StoreKind::Postgres,
                "memory" => StoreKind::Memory,
                other => anyhow::bail!("Invalid ANN_STORE: {} (expected postgres or memory)", other),
            },
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", &var("PORT", "8080"))?,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let mut opts = PgConnectOptions::new()
            .host(&self.postgres_host)
            .port(self.postgres_port);
        if !self.postgres_db.is_empty() {
            opts = opts.database(&self.postgres_db);
        }
        if !self.postgres_user.is_empty() {
            opts = opts.username(&self.postgres_user);
        }
        if !self.postgres_password.is_empty() {
            opts = opts.password(&self.postgres_password);
        }
        opts
    }
}

fn parse<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {:?} ({})", key, value, e))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.postgres_host, "localhost");
        assert_eq!(config.postgres_port, 5432);
        assert_eq!(config.postgres_db, "");
        assert_eq!(config.postgres_user, "");
        assert_eq!(config.postgres_password, "");
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("POSTGRES_HOST", "db"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_DB", "ann"),
            ("POSTGRES_USER", "app"),
            ("POSTGRES_PASSWORD", "secret"),
            ("ANN_STORE", "Memory"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.postgres_host, "db");
        assert_eq!(config.postgres_port, 6543);
        assert_eq!(config.postgres_db, "ann");
        assert_eq!(config.postgres_user, "app");
        assert_eq!(config.postgres_password, "secret");
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let config = config_from(&[("POSTGRES_HOST", ""), ("POSTGRES_PORT", "")]).unwrap();
        assert_eq!(config.postgres_host, "localhost");
        assert_eq!(config.postgres_port, 5432);
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = config_from(&[("POSTGRES_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("POSTGRES_PORT"));
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        assert!(config_from(&[("ANN_STORE", "redis")]).is_err());
    }
}
