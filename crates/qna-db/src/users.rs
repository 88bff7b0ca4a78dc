use rusqlite::{Connection, params};

use qna_types::models::{NewUser, User};

use crate::DbError;
use crate::models::{USER_COLUMNS, UserRow};

pub trait UserRepository: Send + Sync {
    /// Fails with [`DbError::Conflict`] when the username is taken.
    fn create(&self, conn: &Connection, user: &NewUser) -> Result<User, DbError>;

    fn get_by_username(&self, conn: &Connection, username: &str) -> Result<User, DbError>;

    fn get_by_id(&self, conn: &Connection, id: &str) -> Result<User, DbError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteUsers;

impl UserRepository for SqliteUsers {
    fn create(&self, conn: &Connection, user: &NewUser) -> Result<User, DbError> {
        conn.execute(
            "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.username, user.password, user.created_at],
        )?;

        Ok(User {
            id: user.id.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
            created_at: user.created_at,
        })
    }

    fn get_by_username(&self, conn: &Connection, username: &str) -> Result<User, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
        let row = conn.query_row(&sql, [username], UserRow::from_row)?;
        Ok(row.into())
    }

    fn get_by_id(&self, conn: &Connection, id: &str) -> Result<User, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row = conn.query_row(&sql, [id], UserRow::from_row)?;
        Ok(row.into())
    }
}
