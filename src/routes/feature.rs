// src/routes/feature.rs
use async_trait::async_trait;
use serde_json::Value;

use super::Intent;
use crate::error::ClientError;
use crate::message::{StudyPlanRequest, TopicRequest};

pub const DEFAULT_PLAN_DAYS: &str = "5";

/// Blocking question to the user. `None` means the user dismissed it.
#[async_trait]
pub trait Prompter: Send {
    async fn prompt(&mut self, question: &str) -> Option<String>;
}

/// Answers the next prompt with a value supplied up front, then behaves
/// as a dismissed dialog.
#[derive(Debug, Default)]
pub struct PresetAnswer(Option<String>);

impl PresetAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self(Some(answer.into()))
    }

    pub fn dismissed() -> Self {
        Self(None)
    }
}

#[async_trait]
impl Prompter for PresetAnswer {
    async fn prompt(&mut self, _question: &str) -> Option<String> {
        self.0.take()
    }
}

/// Everything needed to issue one feature request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRequest {
    pub intent: Intent,
    /// User-facing line describing what is being fetched.
    pub status: String,
    pub body: Option<Value>,
}

impl FeatureRequest {
    /// Ask the user for the intent's parameters. `Ok(None)` when cancelled.
    pub async fn collect(
        intent: Intent,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<FeatureRequest>, ClientError> {
        let request = match intent {
            Intent::Ask => return Err(ClientError::NotAFeature(intent)),
            Intent::Quiz => {
                let Some(topic) = ask(prompter, "Enter the topic for the quiz (e.g., Acids and Bases):").await else {
                    return Ok(None);
                };
                Self::topic(intent, format!("📝 Generating quiz for: {topic}..."), topic)?
            }
            Intent::Summary => {
                let Some(topic) = ask(prompter, "Enter the chapter/topic to summarize:").await else {
                    return Ok(None);
                };
                Self::topic(intent, format!("📄 Summarizing: {topic}..."), topic)?
            }
            Intent::Countdown => FeatureRequest {
                intent,
                status: "⏳ Checking exam schedule...".to_string(),
                body: None,
            },
            Intent::StudyPlan => {
                let Some(input) = ask(prompter, "Enter Subject and Days (e.g., 'Science, 3'):").await else {
                    return Ok(None);
                };
                let Some((subject, days)) = parse_plan(&input) else {
                    return Ok(None);
                };
                FeatureRequest {
                    intent,
                    status: format!("📅 Creating a {days}-day study plan for {subject}..."),
                    body: Some(serde_json::to_value(StudyPlanRequest { subject, days })?),
                }
            }
            Intent::MindMap => {
                let Some(topic) = ask(prompter, "Enter topic for Mind Map:").await else {
                    return Ok(None);
                };
                Self::topic(intent, format!("🧠 Drawing Mind Map for: {topic}..."), topic)?
            }
        };
        Ok(Some(request))
    }

    fn topic(intent: Intent, status: String, topic: String) -> Result<Self, ClientError> {
        Ok(FeatureRequest {
            intent,
            status,
            body: Some(serde_json::to_value(TopicRequest { topic })?),
        })
    }
}

async fn ask(prompter: &mut dyn Prompter, question: &str) -> Option<String> {
    let answer = prompter.prompt(question).await?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// "Science, 3" -> ("Science", "3"). Days fall back to the default.
pub fn parse_plan(input: &str) -> Option<(String, String)> {
    let mut parts = input.split(',');
    let subject = parts.next()?.trim();
    if subject.is_empty() {
        return None;
    }
    let days = parts
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_PLAN_DAYS);
    Some((subject.to_string(), days.to_string()))
}
