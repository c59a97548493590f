//! PostgreSQL implementation of SessionRegistry.
//!
//! The unique constraint on `sessions.name` makes registration atomic: the
//! insert either claims the name or does nothing.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::domain::session::{Session, SessionName};
use crate::ports::{Registration, SessionRegistry};

/// PostgreSQL implementation of SessionRegistry.
#[derive(Clone)]
pub struct PostgresSessionRegistry {
    pool: PgPool,
}

impl PostgresSessionRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRegistry for PostgresSessionRegistry {
    async fn lookup(
        &self,
        name: &SessionName,
        now: Timestamp,
    ) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, expires_at
            FROM sessions
            WHERE name = $1 AND expires_at > $2
            "#,
        )
        .bind(name.as_str())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to look up session: {}", e)))?;

        row.map(row_to_session).transpose()
    }

    async fn register(&self, candidate: Session) -> Result<Registration, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO sessions (id, name, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(candidate.id().as_uuid())
        .bind(candidate.name().as_str())
        .bind(candidate.created_at().as_datetime())
        .bind(candidate.expires_at().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to register session: {}", e)))?;

        Ok(match inserted {
            Some(_) => Registration::Registered(candidate),
            None => Registration::AlreadyExists,
        })
    }

    async fn list_live(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, expires_at
            FROM sessions
            WHERE expires_at > $1
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list live sessions: {}", e)))?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn list_expired(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, expires_at
            FROM sessions
            WHERE expires_at <= $1
            ORDER BY expires_at ASC
            "#,
        )
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list expired sessions: {}", e)))?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to fetch session: {}", e)))?;

        row.map(row_to_session).transpose()
    }

    async fn remove(&self, session: &Session) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE name = $1 AND id = $2")
            .bind(session.name().as_str())
            .bind(session.id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to remove session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to get id: {}", e)))?;

    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::storage(format!("Failed to get name: {}", e)))?;
    let name = SessionName::new(&name)
        .map_err(|e| DomainError::storage(format!("Stored session name is invalid: {}", e)))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to get created_at: {}", e)))?;

    let expires_at: chrono::DateTime<chrono::Utc> = row
        .try_get("expires_at")
        .map_err(|e| DomainError::storage(format!("Failed to get expires_at: {}", e)))?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        name,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(expires_at),
    ))
}
