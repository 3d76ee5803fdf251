use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, Credentials, UserView};
use crate::password::hash_password;
use crate::store::UserStore;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MSG_USER_EXISTS: &str = "User already exists";
pub const MSG_SAVE_FAILED: &str = "Error saving user data";
pub const MSG_SIGNUP_OK: &str = "Signup successful! Please login.";
pub const MSG_LOGIN_OK: &str = "Login successful";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

pub type AuthResponse = ApiResponse<()>;

const DECOY_PASSWORD: &str = "no-such-user-decoy";

pub struct AuthService {
    store: UserStore,
    bcrypt_cost: u32,
    decoy_hash: String,
}

impl AuthService {
    /// Hashes a decoy password at `bcrypt_cost` up front; logins for unknown
    /// usernames verify against it.
    pub fn new(store: UserStore, bcrypt_cost: u32) -> AppResult<Self> {
        let decoy_hash = hash_password(DECOY_PASSWORD, bcrypt_cost)?;
        Ok(Self {
            store,
            bcrypt_cost,
            decoy_hash,
        })
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Register a user. Checks run in order and the first failure is reported.
    pub fn signup(&self, credentials: &Credentials) -> AuthResponse {
        let (username, password) = match present_fields(credentials) {
            Some(fields) => fields,
            None => return ApiResponse::fail(MSG_FIELDS_REQUIRED),
        };

        if username.chars().count() < MIN_USERNAME_LEN {
            return ApiResponse::fail(MSG_USERNAME_TOO_SHORT);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return ApiResponse::fail(MSG_PASSWORD_TOO_SHORT);
        }
        if self.store.find_by_username(username).is_some() {
            return ApiResponse::fail(MSG_USER_EXISTS);
        }

        let stored = match hash_password(password, self.bcrypt_cost) {
            Ok(hashed) => hashed,
            Err(e) => {
                error!("Failed to hash password for {username}: {e}");
                return ApiResponse::fail(MSG_SAVE_FAILED);
            }
        };

        match self.store.create(username, stored) {
            Ok(user) => {
                info!(user_id = user.id, "New user registered: {username}");
                ApiResponse::ok(MSG_SIGNUP_OK)
            }
            Err(AppError::UserExists) => ApiResponse::fail(MSG_USER_EXISTS),
            Err(e) => {
                error!("Failed to register {username}: {e}");
                ApiResponse::fail(MSG_SAVE_FAILED)
            }
        }
    }

    /// Check credentials. Unknown users and wrong passwords get the same answer.
    pub fn login(&self, credentials: &Credentials) -> AuthResponse {
        let (username, password) = match present_fields(credentials) {
            Some(fields) => fields,
            None => return ApiResponse::fail(MSG_FIELDS_REQUIRED),
        };

        match self.store.find_by_credentials(username, password, &self.decoy_hash) {
            Some(user) => {
                info!("User logged in: {username}");
                ApiResponse::ok(MSG_LOGIN_OK).with_user(UserView::from(&user))
            }
            None => {
                warn!("Failed login attempt: {username}");
                ApiResponse::fail(MSG_INVALID_CREDENTIALS)
            }
        }
    }
}

fn present_fields(credentials: &Credentials) -> Option<(&str, &str)> {
    let username = credentials.username.as_deref().filter(|s| !s.is_empty())?;
    let password = credentials.password.as_deref().filter(|s| !s.is_empty())?;
    Some((username, password))
}
