//! Messaging service layer

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::messaging::{
    ConversationStatus, MessageHistory, PartnerConversation, PartnerMessage,
};
use crate::middleware::AuthenticatedUser;

const DEFAULT_CLOSE_REASON: &str = "Conversación cerrada por el equipo de soporte";
const MESSAGE_HISTORY_LIMIT: i64 = 100;

/// Service for partner support conversations
#[derive(Clone)]
pub struct MessagingService {
    db_pool: PgPool,
}

impl MessagingService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Append a message to the partner's open conversation, opening one when
    /// none exists. The insert-or-skip against the partial unique index means
    /// two concurrent senders cannot open two conversations.
    pub async fn post_message(
        &self,
        partner_id: Uuid,
        partner_name: &str,
        sender: &AuthenticatedUser,
        message: &str,
    ) -> ApiResult<PartnerMessage> {
        let text = message.trim();
        if text.is_empty() {
            return Err(ApiError::ValidationError(
                "El mensaje no puede estar vacío".to_string(),
            ));
        }

        let conversation = self.ensure_open(partner_id, partner_name).await?;

        let sent_by_admin = sender.role.is_support();

        let message = sqlx::query_as::<_, PartnerMessage>(
            r#"
            INSERT INTO partner_messages (
                conversation_id, partner_id, partner_name, message,
                sent_by_admin, sender_id, sender_name, created_at, read
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(partner_id)
        .bind(&conversation.partner_name)
        .bind(text)
        .bind(sent_by_admin)
        .bind(sender.user_id)
        .bind(&sender.name)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(message)
    }

    /// Close the partner's open conversation
    pub async fn close_conversation(
        &self,
        closer: &AuthenticatedUser,
        partner_id: Uuid,
        reason: Option<String>,
    ) -> ApiResult<PartnerConversation> {
        if !closer.role.is_support() {
            return Err(ApiError::Forbidden(
                "No tienes permisos para cerrar conversaciones".to_string(),
            ));
        }

        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLOSE_REASON.to_string());

        let conversation = sqlx::query_as::<_, PartnerConversation>(
            r#"
            UPDATE partner_conversations
            SET status = 'closed', closed_at = $2, closed_by = $3, close_reason = $4
            WHERE partner_id = $1 AND status = 'open'
            RETURNING *
            "#,
        )
        .bind(partner_id)
        .bind(Utc::now())
        .bind(closer.user_id)
        .bind(&reason)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No hay una conversación abierta para este socio".to_string())
        })?;

        tracing::info!(
            partner_id = %partner_id,
            conversation_id = %conversation.id,
            closed_by = %closer.user_id,
            "Conversation closed"
        );

        Ok(conversation)
    }

    /// Message history for the partner's open conversation, oldest first
    pub async fn message_history(&self, partner_id: Uuid) -> ApiResult<MessageHistory> {
        let latest = sqlx::query_as::<_, PartnerConversation>(
            r#"
            SELECT * FROM partner_conversations
            WHERE partner_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(partner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        let conversation = match latest {
            Some(c) if c.status == ConversationStatus::Open => c,
            Some(c) => {
                return Ok(MessageHistory {
                    conversation_open: false,
                    conversation_status: Some(c.status),
                    messages: Vec::new(),
                })
            }
            None => {
                return Ok(MessageHistory {
                    conversation_open: false,
                    conversation_status: None,
                    messages: Vec::new(),
                })
            }
        };

        let messages = sqlx::query_as::<_, PartnerMessage>(
            r#"
            SELECT * FROM partner_messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(conversation.id)
        .bind(MESSAGE_HISTORY_LIMIT)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(MessageHistory {
            conversation_open: true,
            conversation_status: Some(ConversationStatus::Open),
            messages,
        })
    }

    /// Find the partner's open conversation, opening one when none exists.
    /// An admin can close the conversation between the insert-or-skip and the
    /// re-read, so the pair is retried rather than treated as a server error.
    async fn ensure_open(
        &self,
        partner_id: Uuid,
        partner_name: &str,
    ) -> ApiResult<PartnerConversation> {
        for _ in 0..3 {
            sqlx::query(
                r#"
                INSERT INTO partner_conversations (partner_id, partner_name, status, created_at)
                VALUES ($1, $2, 'open', $3)
                ON CONFLICT (partner_id) WHERE status = 'open' DO NOTHING
                "#,
            )
            .bind(partner_id)
            .bind(partner_name)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await?;

            if let Some(conversation) = self.find_open(partner_id).await? {
                return Ok(conversation);
            }
        }

        Err(ApiError::ServiceUnavailable(
            "No se pudo abrir la conversación".to_string(),
        ))
    }

    async fn find_open(&self, partner_id: Uuid) -> ApiResult<Option<PartnerConversation>> {
        let conversation = sqlx::query_as::<_, PartnerConversation>(
            "SELECT * FROM partner_conversations WHERE partner_id = $1 AND status = 'open'",
        )
        .bind(partner_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(conversation)
    }
}
