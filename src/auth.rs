//! Local accounts: credential records, password hashing, register and login.
//!
//! Credentials live in a single JSON object keyed by username. New records
//! are hashed with salted PBKDF2-HMAC-SHA256. Records without a salt are the
//! older unsalted SHA-256 format and are still accepted at login.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::session::{Session, SessionStore};
use crate::storage::Storage;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;

/// Password hashing scheme for new credentials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashScheme {
    #[default]
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2Sha256,
    #[serde(rename = "sha256")]
    Sha256,
}

/// Stored credential for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(alias = "password")]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Username -> credential, persisted as a whole
pub type CredentialMap = BTreeMap<String, Credential>;

impl Credential {
    /// Hash `password` under `scheme`, generating a fresh salt when needed.
    pub fn new(password: &str, scheme: HashScheme, iterations: u32) -> Self {
        let (password_hash, salt, iterations) = match scheme {
            HashScheme::Sha256 => (hash_password_sha256(password), None, None),
            HashScheme::Pbkdf2Sha256 => {
                let salt = generate_salt();
                let hash = hash_password_pbkdf2(password, &salt, iterations);
                (hash, Some(salt), Some(iterations))
            }
        };

        Self {
            password_hash,
            salt,
            iterations,
            created_at: Some(Utc::now()),
        }
    }

    /// Check `password` against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        let attempt = match &self.salt {
            Some(salt) => hash_password_pbkdf2(
                password,
                salt,
                self.iterations.unwrap_or(DEFAULT_PBKDF2_ITERATIONS),
            ),
            None => hash_password_sha256(password),
        };
        constant_time_eq(
            attempt.as_bytes(),
            self.password_hash.to_ascii_lowercase().as_bytes(),
        )
    }
}

/// Unsalted SHA-256, hex encoded.
pub fn hash_password_sha256(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// PBKDF2-HMAC-SHA256 over the hex salt, hex encoded.
pub fn hash_password_pbkdf2(password: &str, salt: &str, iterations: u32) -> String {
    let mut out = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut out);
    hex::encode(out)
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Usernames double as task file names.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::InvalidInput("username cannot be empty".to_string()));
    }
    if username != username.trim() {
        return Err(Error::InvalidInput(format!(
            "username cannot start or end with whitespace: '{username}'"
        )));
    }
    if username == "." || username == ".." || username.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidInput(format!(
            "invalid username '{username}'"
        )));
    }
    Ok(())
}

/// Credential and session manager
#[derive(Debug, Clone)]
pub struct Accounts {
    storage: Storage,
    auth: AuthConfig,
    sessions: SessionStore,
}

impl Accounts {
    pub fn new(storage: Storage, auth: AuthConfig) -> Self {
        let sessions = SessionStore::new(storage.clone());
        Self {
            storage,
            auth,
            sessions,
        }
    }

    /// Load the full credential mapping
    pub fn users(&self) -> Result<CredentialMap> {
        self.storage.read_json_or_default(&self.storage.users_file())
    }

    /// Create a user and log them in.
    pub fn register(&self, username: &str, password: &str) -> Result<Session> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(Error::InvalidInput("password cannot be empty".to_string()));
        }

        if self.users()?.contains_key(username) {
            return Err(Error::UserAlreadyExists(username.to_string()));
        }

        let credential = Credential::new(password, self.auth.scheme, self.auth.iterations);
        // Re-checked under the lock: another process may have registered
        // the same name while the hash was computed.
        self.storage
            .update_json(&self.storage.users_file(), |users: &mut CredentialMap| {
                if users.contains_key(username) {
                    return Err(Error::UserAlreadyExists(username.to_string()));
                }
                users.insert(username.to_string(), credential);
                Ok(())
            })?;
        tracing::debug!(user = username, scheme = ?self.auth.scheme, "user registered");

        self.sessions.begin(username)
    }

    /// Verify credentials and make `username` the current user.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let users = self.users()?;
        let credential = users
            .get(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

        if !credential.verify(password) {
            tracing::debug!(user = username, "password rejected");
            return Err(Error::InvalidPassword);
        }

        self.sessions.begin(username)
    }

    /// Resolve the logged-in user.
    pub fn current_user(&self) -> Result<Session> {
        self.sessions.current()
    }

    pub fn logout(&self) -> Result<()> {
        self.sessions.end()
    }
}
