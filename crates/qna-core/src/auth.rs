use std::sync::Arc;

use chrono::Utc;
use qna_db::{Database, DbError, UserRepository};
use qna_types::models::{NewUser, User};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::credentials::{hash_password, verify_password};
use crate::error::Error;

/// Resolve HTTP Basic credentials to a stored user.
pub struct AuthorizeUser {
    db: Arc<Database>,
    users: Arc<dyn UserRepository>,
}

impl AuthorizeUser {
    pub fn new(db: Arc<Database>, users: Arc<dyn UserRepository>) -> Self {
        Self { db, users }
    }

    /// Unknown usernames and wrong passwords both fail with
    /// [`Error::InvalidCredentials`] so callers cannot probe for accounts.
    pub fn execute(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
    ) -> Result<User, Error> {
        let found = self
            .db
            .with_conn(cancel, |conn| self.users.get_by_username(conn, username));

        match found {
            Ok(user) if verify_password(&user.password, password) => Ok(user),
            Ok(_) | Err(DbError::NotFound) => {
                info!(username, "Failed login attempt");
                Err(Error::InvalidCredentials)
            }
            Err(e) => Err(Error::internal("get user by username", e)),
        }
    }
}

/// Account to create at startup, from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

/// Idempotently create configured users. Existing usernames are left as they are.
pub struct ProvisionUsers {
    db: Arc<Database>,
    users: Arc<dyn UserRepository>,
    hash_passwords: bool,
}

impl ProvisionUsers {
    pub fn new(db: Arc<Database>, users: Arc<dyn UserRepository>, hash_passwords: bool) -> Self {
        Self {
            db,
            users,
            hash_passwords,
        }
    }

    /// Returns how many users were newly created.
    pub fn execute(&self, cancel: &CancellationToken, seeds: &[SeedUser]) -> Result<usize, Error> {
        let mut created = 0;

        for seed in seeds {
            let password = if self.hash_passwords {
                match hash_password(&seed.password) {
                    Ok(hash) => hash,
                    Err(e) => {
                        warn!(username = %seed.username, "Password hashing failed: {}", e);
                        return Err(Error::Hashing(e));
                    }
                }
            } else {
                seed.password.clone()
            };

            let new_user = NewUser {
                id: Uuid::new_v4().to_string(),
                username: seed.username.clone(),
                password,
                created_at: Utc::now(),
            };

            match self
                .db
                .with_conn(cancel, |conn| self.users.create(conn, &new_user))
            {
                Ok(user) => {
                    debug!(user_id = %user.id, username = %user.username, "User provisioned");
                    created += 1;
                }
                Err(DbError::Conflict) => {
                    debug!(username = %seed.username, "User already exists, skipping");
                }
                Err(e) => return Err(Error::internal("create user", e)),
            }
        }

        Ok(created)
    }
}
