//! PostgreSQL user store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::error::SqlState;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};

use super::{StoreError, StoreResult, UserStore};
use crate::auth::models::{NewUser, Role, User, UserId};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            BIGSERIAL PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Users table accessed through a single pipelined connection.
///
/// The connection is re-established on the next operation after it closes,
/// e.g. when the server restarts.
pub struct PostgresStore {
    url: String,
    client: RwLock<Arc<Client>>,
}

async fn open(url: &str) -> StoreResult<Client> {
    let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(client)
}

impl PostgresStore {
    /// Connect using a `postgres://` URL or key/value connection string
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = open(url).await?;
        tracing::debug!("Connected to PostgreSQL");
        Ok(Self {
            url: url.to_string(),
            client: RwLock::new(Arc::new(client)),
        })
    }

    /// Current client, reconnecting first if the connection has gone away
    async fn client(&self) -> StoreResult<Arc<Client>> {
        {
            let client = self.client.read().await;
            if !client.is_closed() {
                return Ok(client.clone());
            }
        }

        let mut client = self.client.write().await;
        // Another task may have reconnected while we waited for the lock
        if client.is_closed() {
            tracing::warn!("PostgreSQL connection closed, reconnecting");
            *client = Arc::new(open(&self.url).await?);
            tracing::info!("Reconnected to PostgreSQL");
        }
        Ok(client.clone())
    }

    /// Create the users table if it does not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        self.client().await?.batch_execute(SCHEMA).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

/// Ids are `BIGSERIAL`; anything beyond `i64::MAX` cannot exist in the table.
fn sql_id(id: UserId) -> Option<i64> {
    i64::try_from(id).ok()
}

fn map_write_error(err: tokio_postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::Conflict
    } else {
        StoreError::Database(err)
    }
}

fn user_from_row(row: &Row) -> StoreResult<User> {
    let id: i64 = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(User {
        id: UserId::try_from(id).map_err(|_| StoreError::Corrupt(format!("negative id {}", id)))?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse::<Role>().map_err(StoreError::Corrupt)?,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_id(&self, id: UserId) -> StoreResult<User> {
        let id = sql_id(id).ok_or(StoreError::NotFound)?;
        let query = format!("SELECT {} FROM users WHERE id = $1", COLUMNS);
        let row = self
            .client()
            .await?
            .query_opt(&query, &[&id])
            .await?
            .ok_or(StoreError::NotFound)?;
        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<User> {
        let query = format!("SELECT {} FROM users WHERE email = $1", COLUMNS);
        let row = self
            .client()
            .await?
            .query_opt(&query, &[&email])
            .await?
            .ok_or(StoreError::NotFound)?;
        user_from_row(&row)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY id", COLUMNS);
        let rows = self.client().await?.query(&query, &[]).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        let row = self
            .client()
            .await?
            .query_one(
                &query,
                &[&user.name, &user.email, &user.password_hash, &user.role.as_str()],
            )
            .await
            .map_err(map_write_error)?;
        user_from_row(&row)
    }

    async fn update(&self, user: &User) -> StoreResult<User> {
        let id = sql_id(user.id).ok_or(StoreError::NotFound)?;
        let query = format!(
            "UPDATE users SET name = $2, email = $3, role = $4, updated_at = now() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let row = self
            .client()
            .await?
            .query_opt(&query, &[&id, &user.name, &user.email, &user.role.as_str()])
            .await
            .map_err(map_write_error)?
            .ok_or(StoreError::NotFound)?;
        user_from_row(&row)
    }

    async fn delete(&self, id: UserId) -> StoreResult<()> {
        let id = sql_id(id).ok_or(StoreError::NotFound)?;
        let deleted = self
            .client()
            .await?
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_id_rejects_out_of_range() {
        assert_eq!(sql_id(1), Some(1));
        assert_eq!(sql_id(u64::MAX), None);
    }
}
