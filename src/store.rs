//! User persistence backed by a single JSON array file.
//!
//! Every read loads the whole file and every write rewrites it. Creating a
//! user holds an in-process lock across the check, append and rewrite so two
//! signups for the same name cannot both land.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{SubsecRound, Utc};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::password::password_matches;

pub struct UserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl UserStore {
    /// Open the store at `path`, creating the parent directory and an empty
    /// `[]` file if they do not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                info!("Creating data directory {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            info!("Creating users file {}", path.display());
            fs::write(&path, "[]")?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored users. A missing or unreadable file yields an empty list.
    pub fn load_all(&self) -> Vec<User> {
        match self.read_users() {
            Ok(users) => users,
            Err(e) => {
                error!("Error reading users file {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn read_users(&self) -> AppResult<Vec<User>> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the file contents with `users`.
    pub fn save_all(&self, users: &[User]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(users)?;
        fs::write(&self.path, json).map_err(|e| {
            error!("Error saving users file {}: {e}", self.path.display());
            AppError::from(e)
        })
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.load_all().into_iter().find(|u| u.username == username)
    }

    /// The user with this username and password. When no record carries the
    /// username, `password` is still checked against `decoy_hash` so a miss
    /// costs about as much as a wrong password.
    pub fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
        decoy_hash: &str,
    ) -> Option<User> {
        let mut candidates = self
            .load_all()
            .into_iter()
            .filter(|u| u.username == username)
            .peekable();

        if candidates.peek().is_none() {
            password_matches(password, decoy_hash);
            return None;
        }

        candidates.find(|u| password_matches(password, &u.password))
    }

    /// Append a new user unless the username is already taken.
    ///
    /// Unlike lookups, an unreadable file is an error here: rewriting it from
    /// an empty list would drop every stored user.
    pub fn create(&self, username: &str, stored_password: String) -> AppResult<User> {
        let _guard = self.write_lock.lock();

        let mut users = match self.read_users() {
            Ok(users) => users,
            Err(AppError::Io(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                error!("Refusing to rewrite unreadable users file {}: {e}", self.path.display());
                return Err(e);
            }
        };
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::UserExists);
        }

        let created_at = Utc::now().trunc_subsecs(3);
        let mut id = created_at.timestamp_millis();
        if users.iter().any(|u| u.id == id) {
            id = users.iter().map(|u| u.id).max().unwrap_or(id) + 1;
        }

        let user = User {
            id,
            username: username.to_string(),
            password: stored_password,
            created_at,
        };
        users.push(user.clone());
        self.save_all(&users)?;

        Ok(user)
    }
}
