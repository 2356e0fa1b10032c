//! Typed view of the chat and notification payloads.
//!
//! The client itself moves untyped `serde_json::Value`s; these types are
//! for consumers that want to match on the dashboard's event kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoming events on the chat socket.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ChatEvent {
    /// A chat message in a customer/seller conversation
    #[serde(rename = "chat_message")]
    Message(ChatMessage),
    /// Dashboard notification (order status, stock alert, delivery update)
    #[serde(rename = "notification")]
    Notification(Notification),
    /// Typing indicator
    #[serde(rename = "typing")]
    Typing(TypingIndicator),
    /// Any type this client does not know yet
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Free-form category, e.g. "order", "inventory", "delivery"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TypingIndicator {
    pub conversation_id: String,
    pub user_id: String,
    pub is_typing: bool,
}

/// Outgoing frames sent by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutgoingChat {
    #[serde(rename = "chat_message")]
    Message {
        conversation_id: String,
        content: String,
    },
    #[serde(rename = "typing")]
    Typing {
        conversation_id: String,
        is_typing: bool,
    },
    #[serde(rename = "mark_read")]
    MarkRead {
        conversation_id: String,
        message_id: String,
    },
}

impl OutgoingChat {
    pub fn message(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        OutgoingChat::Message {
            conversation_id: conversation_id.into(),
            content: content.into(),
        }
    }

    pub fn typing(conversation_id: impl Into<String>, is_typing: bool) -> Self {
        OutgoingChat::Typing {
            conversation_id: conversation_id.into(),
            is_typing,
        }
    }

    pub fn mark_read(conversation_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        OutgoingChat::MarkRead {
            conversation_id: conversation_id.into(),
            message_id: message_id.into(),
        }
    }
}
