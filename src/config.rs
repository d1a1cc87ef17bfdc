use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ROWS: u32 = 999;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

const ROWS_EXPECTED: &str = "an integer between 0 and 2147483647";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Which identifier a payment row stores in `payments.order_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentOrderRef {
    /// The loop counter of the iteration that produced the payment. Matches
    /// what the example warehouse queries were written against, even though
    /// it does not line up with `orders.id`.
    #[default]
    Iteration,
    /// The primary key the database assigned to the order row.
    OrderId,
}

impl FromStr for PaymentOrderRef {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iteration" => Ok(PaymentOrderRef::Iteration),
            "order_id" => Ok(PaymentOrderRef::OrderId),
            _ => Err(()),
        }
    }
}

/// Connection parameters, one field per `PG_*` variable.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub user: String,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub database: String,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: None,
            host: None,
            port: 5432,
            database: "postgres".to_string(),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadgenConfig {
    pub db: DbSettings,
    /// Number of iterations; the loop counter runs from 1 to `rows`.
    pub rows: u32,
    /// Pause after each committed iteration.
    pub interval: Duration,
    pub seed: Option<u64>,
    pub payment_order_ref: PaymentOrderRef,
}

impl Default for LoadgenConfig {
    fn default() -> Self {
        Self {
            db: DbSettings::default(),
            rows: DEFAULT_ROWS,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            seed: None,
            payment_order_ref: PaymentOrderRef::default(),
        }
    }
}

impl LoadgenConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset and
    /// empty values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let db = DbSettings {
            user: get("PG_USER").unwrap_or(defaults.db.user),
            password: get("PG_PW"),
            host: get("PG_HOST"),
            port: parse_or("PG_PORT", get("PG_PORT"), "a port number", defaults.db.port)?,
            database: get("PG_DB").unwrap_or(defaults.db.database),
        };

        // The loop counter is stored in an INTEGER column.
        let rows: u32 = parse_or(
            "LOADGEN_ROWS",
            get("LOADGEN_ROWS"),
            ROWS_EXPECTED,
            defaults.rows,
        )?;
        if i32::try_from(rows).is_err() {
            return Err(ConfigError::Invalid {
                key: "LOADGEN_ROWS",
                expected: ROWS_EXPECTED,
                value: rows.to_string(),
            });
        }
        let interval_ms = parse_or(
            "LOADGEN_INTERVAL_MS",
            get("LOADGEN_INTERVAL_MS"),
            "a number of milliseconds",
            DEFAULT_INTERVAL_MS,
        )?;
        let seed = match get("LOADGEN_SEED") {
            Some(raw) => Some(parse_or("LOADGEN_SEED", Some(raw), "an unsigned integer", 0)?),
            None => None,
        };
        let payment_order_ref = match get("LOADGEN_PAYMENT_ORDER_REF") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "LOADGEN_PAYMENT_ORDER_REF",
                expected: "'iteration' or 'order_id'",
                value: raw,
            })?,
            None => defaults.payment_order_ref,
        };

        Ok(Self {
            db,
            rows,
            interval: Duration::from_millis(interval_ms),
            seed,
            payment_order_ref,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
        None => Ok(default),
    }
}
