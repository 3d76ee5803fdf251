use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::info;

use crate::error::{AppError, AppResult};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub users_file: PathBuf,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Read settings from the environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> AppResult<Self> {
        let bcrypt_cost = try_load("BOOKSTORE_BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::Config {
                message: format!("BOOKSTORE_BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"),
            });
        }

        Ok(Self {
            host: try_load("BOOKSTORE_HOST", "127.0.0.1".to_string())?,
            port: try_load("BOOKSTORE_PORT", 3000)?,
            users_file: PathBuf::from(try_load(
                "BOOKSTORE_USERS_FILE",
                "data/users.json".to_string(),
            )?),
            bcrypt_cost,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| AppError::Config {
            message: format!("invalid {key} value {raw:?}: {e}"),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
