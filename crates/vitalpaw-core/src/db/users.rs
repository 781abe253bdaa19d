//! User database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{now_timestamp, Role, User};

const USER_COLUMNS: &str = "id, external_id, email, name, gender, role, vital_coins, created_at, updated_at";

impl Database {
    /// Insert a new user.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (
                id, external_id, email, name, gender, role,
                vital_coins, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user.id,
                user.external_id,
                user.email,
                user.name,
                user.gender,
                user.role.as_str(),
                user.vital_coins,
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a user by local ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        self.query_single_user("id", id)
    }

    /// Get a user by identity-provider subject.
    pub fn get_user_by_external_id(&self, external_id: &str) -> DbResult<Option<User>> {
        self.query_single_user("external_id", external_id)
    }

    /// Get a user by email.
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.query_single_user("email", email)
    }

    /// List users holding `role`, in registration order.
    pub fn list_users_by_role(&self, role: Role) -> DbResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = ? ORDER BY created_at, id",
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([role.as_str()], user_row)?;

        let mut users: Vec<User> = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// Case-insensitive substring search over emails of users holding `role`.
    pub fn search_users_by_email(&self, fragment: &str, role: Role) -> DbResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {} FROM users
            WHERE role = ?1 AND instr(lower(email), lower(?2)) > 0
            ORDER BY email
            "#,
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![role.as_str(), fragment], user_row)?;

        let mut users: Vec<User> = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// Set a user's role.
    pub fn update_user_role(&self, id: &str, role: Role) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET role = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, role.as_str(), now_timestamp()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Credit VitalCoins to a user.
    pub fn add_vital_coins(&self, id: &str, amount: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET vital_coins = vital_coins + ?2, updated_at = ?3 WHERE id = ?1",
            params![id, amount, now_timestamp()],
        )?;
        Ok(rows_affected > 0)
    }

    fn query_single_user(&self, column: &str, value: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        self.conn
            .query_row(&sql, [value], user_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    external_id: String,
    email: String,
    name: String,
    gender: String,
    role: String,
    vital_coins: i64,
    created_at: String,
    updated_at: String,
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        external_id: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        gender: row.get(4)?,
        role: row.get(5)?,
        vital_coins: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        Ok(User {
            id: row.id,
            external_id: row.external_id,
            email: row.email,
            name: row.name,
            gender: row.gender,
            role,
            vital_coins: row.vital_coins,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
