// 🔐 User Directory - Login and registration over an in-memory user list
//
// - Passwords are kept as SHA-256 hex digests, never as plaintext
// - A successful login/registration stores the user in the session store
// - Every input is trimmed before it is checked

use crate::error::{AuthError, ManagerError};
use crate::events::{Event, EventLog};
use crate::repository::{Entity, KeyedRepository};
use crate::session::{InMemorySessionStore, SessionStore};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub type UserId = u64;

pub const DEFAULT_SESSION_KEY: &str = "currentUser";

// ============================================================================
// USER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Hex SHA-256 of the password
    pub password_digest: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn password_matches(&self, password: &str) -> bool {
        self.password_digest == digest_password(password)
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}

/// Hex-encoded SHA-256 digest of a password
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Plaintext user record as it appears in seed files
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl From<SeedUser> for User {
    fn from(seed: SeedUser) -> Self {
        User {
            id: seed.id,
            first_name: seed.first_name,
            last_name: seed.last_name,
            email: seed.email,
            password_digest: digest_password(&seed.password),
        }
    }
}

/// Registration form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Load seed users from a CSV file with columns id,first_name,last_name,email,password
pub fn load_users_csv(csv_path: &Path) -> Result<Vec<SeedUser>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open users CSV: {:?}", csv_path))?;

    let mut users = Vec::new();
    for result in rdr.deserialize() {
        let user: SeedUser = result.context("Failed to deserialize user")?;
        users.push(user);
    }

    Ok(users)
}

/// The ten demo accounts (all with password "12345678")
pub fn demo_users() -> Vec<SeedUser> {
    let people = [
        ("Lorilee", "Adame", "ladame0@guardian.co.uk"),
        ("Gannon", "Manwell", "gmanwell1@naver.com"),
        ("Christiana", "Dowtry", "cdowtry2@mapy.cz"),
        ("Warden", "Ansteys", "wansteys3@yahoo.com"),
        ("Claybourne", "Barbosa", "cbarbosa4@si.edu"),
        ("Zita", "Triner", "ztriner5@youku.com"),
        ("Orsa", "Pilcher", "opilcher6@surveymonkey.com"),
        ("Lyn", "Fockes", "lfockes7@answers.com"),
        ("Harv", "Olifaunt", "holifaunt8@jalbum.net"),
        ("Nikita", "Duncanson", "nduncanson9@harvard.edu"),
    ];

    people
        .iter()
        .enumerate()
        .map(|(index, (first, last, email))| SeedUser {
            id: index as UserId + 1,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            password: "12345678".to_string(),
        })
        .collect()
}

// ============================================================================
// USER DIRECTORY
// ============================================================================

#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<RwLock<KeyedRepository<User>>>,
    session: Arc<dyn SessionStore>,
    session_key: String,
    events: EventLog,
}

impl UserDirectory {
    /// Empty directory with an in-memory session
    pub fn new() -> Self {
        Self::with_session(Arc::new(InMemorySessionStore::new()), DEFAULT_SESSION_KEY)
    }

    pub fn with_session(session: Arc<dyn SessionStore>, session_key: &str) -> Self {
        UserDirectory {
            users: Arc::new(RwLock::new(KeyedRepository::new())),
            session,
            session_key: session_key.to_string(),
            events: EventLog::new("user_directory"),
        }
    }

    /// Directory pre-loaded with the demo accounts
    pub fn with_seed_users() -> std::result::Result<Self, ManagerError> {
        let directory = Self::new();
        directory.seed(demo_users())?;
        Ok(directory)
    }

    /// Insert seed records; fails on the first duplicate id and keeps what came before
    pub fn seed(&self, records: Vec<SeedUser>) -> std::result::Result<usize, ManagerError> {
        let mut users = self.users.write();
        let mut inserted = 0;
        for record in records {
            users.add(User::from(record))?;
            inserted += 1;
        }
        info!("seeded {} users", inserted);
        Ok(inserted)
    }

    pub fn login(&self, email: &str, password: &str) -> std::result::Result<User, AuthError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            warn!("login rejected: missing fields");
            return Err(AuthError::MissingFields);
        }

        let user = self
            .users
            .read()
            .find(|u| u.email == email && u.password_matches(password))
            .cloned()
            .ok_or_else(|| {
                warn!("login rejected for {}", email);
                AuthError::InvalidCredentials
            })?;

        self.store_current_user(&user)?;
        info!(user = user.id, "welcome {}", user.full_name());
        self.events.record(
            "UserLoggedIn",
            User::KIND,
            user.id,
            serde_json::json!({ "email": user.email }),
        );
        Ok(user)
    }

    pub fn register(&self, form: NewUser) -> std::result::Result<User, AuthError> {
        let first_name = form.first_name.trim();
        let last_name = form.last_name.trim();
        let email = form.email.trim();
        let password = form.password.trim();
        if [first_name, last_name, email, password]
            .iter()
            .any(|field| field.is_empty())
        {
            warn!("registration rejected: missing fields");
            return Err(AuthError::MissingFields);
        }

        let user = {
            let mut users = self.users.write();
            if users.find(|u| u.email == email).is_some() {
                warn!("registration rejected: {} already registered", email);
                return Err(AuthError::DuplicateEmail {
                    email: email.to_string(),
                });
            }

            let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let user = User {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password_digest: digest_password(password),
            };
            users
                .add(user.clone())
                .map_err(|e| AuthError::Session(e.to_string()))?;
            user
        };

        self.store_current_user(&user)?;
        info!(user = user.id, "registered {}", user.full_name());
        self.events.record(
            "UserRegistered",
            User::KIND,
            user.id,
            serde_json::json!({ "email": user.email }),
        );
        Ok(user)
    }

    /// Case-insensitive match on "first last" or email; empty keyword lists everyone
    pub fn search(&self, keyword: &str) -> Vec<User> {
        let keyword = keyword.trim().to_lowercase();
        let users = self.users.read();
        if keyword.is_empty() {
            return users.list_all();
        }
        users.filter(|u| {
            u.full_name().to_lowercase().contains(&keyword)
                || u.email.to_lowercase().contains(&keyword)
        })
    }

    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }

    /// The user stored by the last successful login/registration
    pub fn current_user(&self) -> std::result::Result<Option<User>, AuthError> {
        match self.session.get(&self.session_key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AuthError::Session(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> std::result::Result<(), AuthError> {
        self.session.remove(&self.session_key)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.events()
    }

    fn store_current_user(&self, user: &User) -> std::result::Result<(), AuthError> {
        let json = serde_json::to_string(user).map_err(|e| AuthError::Session(e.to_string()))?;
        self.session.set(&self.session_key, json)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
