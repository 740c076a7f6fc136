// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::session::SessionId;

#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub session_id: &'a SessionId,
}

#[derive(Debug, Serialize)]
pub struct TopicRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct StudyPlanRequest {
    pub subject: String,
    pub days: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A rendered conversational unit. Display only; the view is the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Bot }
    }
}
