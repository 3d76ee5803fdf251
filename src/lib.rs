//! Bookstore API: account signup/login against a JSON users file, a fixed
//! book catalog, and two flavours of catalog recommendations.
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | POST | `/signup` | register a user |
//! | POST | `/login` | check credentials |
//! | GET | `/books` | the catalog |
//! | POST | `/recommend` | genre/price filter, best rated first |
//! | POST | `/ai-recommend` | keyword-scored ranking |
//! | GET | `/users` | stored users (debug) |
//! | GET | `/` | health |

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod recommend;
pub mod routes;
pub mod store;

use auth::AuthService;
use catalog::Catalog;
use config::Config;
use error::AppResult;
use store::UserStore;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub catalog: Catalog,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(catalog: Catalog, auth: AuthService) -> Self {
        Self { catalog, auth }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let store = UserStore::open(&config.users_file)?;
        Ok(Self::new(
            Catalog::builtin(),
            AuthService::new(store, config.bcrypt_cost)?,
        ))
    }
}
