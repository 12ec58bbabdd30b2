//! Conversation and message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "conversation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Open,
    Closed,
}

/// Partner support conversation. A partial unique index guarantees at most
/// one open conversation per partner.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PartnerConversation {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub partner_name: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<Uuid>,
    pub close_reason: Option<String>,
}

/// Message inside a conversation; appended, never mutated
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PartnerMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub partner_id: Uuid,
    pub partner_name: String,
    pub message: String,
    pub sent_by_admin: bool,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Request DTO for sending a message
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub message: String,
}

/// Request DTO for an admin sending a message to a partner
#[derive(Debug, Deserialize)]
pub struct AdminMessageRequest {
    pub message: String,
    /// Used to label the conversation when the admin message opens it
    pub partner_name: Option<String>,
}

/// Request DTO for closing a conversation
#[derive(Debug, Deserialize, Default)]
pub struct CloseConversationRequest {
    pub reason: Option<String>,
}

/// Message history for a partner. `conversation_status` is `None` when the
/// partner never had a conversation, distinguishing that case from a closed
/// one.
#[derive(Debug, Serialize)]
pub struct MessageHistory {
    pub conversation_open: bool,
    pub conversation_status: Option<ConversationStatus>,
    pub messages: Vec<PartnerMessage>,
}
