//! PostgreSQL implementation of ConversationRepository.
//!
//! One row per conversation. Messages live in a JSONB array on the row, so a
//! conversation is always read and written whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationRepository, RepositoryError};

const SELECT_COLUMNS: &str =
    "SELECT id, messages, is_finished, started_at, finished_at, updated_at FROM conversations";

/// PostgreSQL implementation of ConversationRepository.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    /// Creates a new PostgresConversationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::Database(format!("Failed to fetch conversation: {}", e))
            })?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn find_by_id_and_finished(
        &self,
        id: ConversationId,
        finished: bool,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(&format!(
            "{} WHERE id = $1 AND is_finished = $2",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(finished)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::Database(format!("Failed to fetch conversation: {}", e))
        })?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<Conversation>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(&format!(
            "{} ORDER BY finished_at DESC NULLS LAST, started_at DESC LIMIT $1",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::Database(format!("Failed to list conversations: {}", e))
        })?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn save(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO conversations (
                id, messages, is_finished, started_at, finished_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, now())
            ON CONFLICT (id) DO UPDATE SET
                messages = EXCLUDED.messages,
                is_finished = EXCLUDED.is_finished,
                finished_at = EXCLUDED.finished_at,
                updated_at = now()
            RETURNING updated_at
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(Json(conversation.messages()))
        .bind(conversation.is_finished())
        .bind(conversation.started_at().as_datetime())
        .bind(conversation.finished_at().map(|t| *t.as_datetime()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save conversation: {}", e)))?;

        let updated_at: DateTime<Utc> = row
            .try_get("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Missing updated_at: {}", e)))?;

        let mut saved = conversation.clone();
        saved.touch(Timestamp::from_datetime(updated_at));
        Ok(saved)
    }
}

fn row_to_conversation(row: &PgRow) -> Result<Conversation, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Serialization(e.to_string());

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let Json(messages): Json<Vec<Message>> = row.try_get("messages").map_err(decode)?;
    let is_finished: bool = row.try_get("is_finished").map_err(decode)?;
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(decode)?;
    let finished_at: Option<DateTime<Utc>> = row.try_get("finished_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        messages,
        is_finished,
        Timestamp::from_datetime(started_at),
        finished_at.map(Timestamp::from_datetime),
        Timestamp::from_datetime(updated_at),
    ))
}
