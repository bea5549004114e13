use crate::error::ConfigError;
use std::net::SocketAddr;

/// Which world state backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackend {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: LedgerBackend,
    /// Seed the ledger with the base farmers at startup.
    pub init_ledger: bool,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = {
            let raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
            raw.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw,
            })?
        };

        let backend = match lookup("LEDGER_BACKEND").as_deref() {
            None | Some("memory") => LedgerBackend::Memory,
            Some("postgres") => {
                let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing {
                    name: "DATABASE_URL",
                })?;
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    None => DEFAULT_MAX_CONNECTIONS,
                    Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                        name: "DATABASE_MAX_CONNECTIONS",
                        value: raw,
                    })?,
                };
                LedgerBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LEDGER_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let init_ledger = match lookup("LEDGER_INIT").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LEDGER_INIT",
                    value: other.to_string(),
                })
            }
        };

        let log_filter = lookup("LOG_FILTER").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            bind_addr,
            backend,
            init_ledger,
            log_filter,
        })
    }
}
