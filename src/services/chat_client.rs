// src/services/chat_client.rs
use serde_json::Value;
use tracing::{debug, info, warn};

use super::backend::Backend;
use super::diagram::{DiagramNode, DiagramRenderer};
use super::render::{speech_text, strip_code_fences};
use super::session::SessionId;
use super::view::ChatView;
use super::voice::{MicAction, Recognizer, Speaker};
use crate::error::ClientError;
use crate::message::{AnswerResponse, AskRequest, Message};
use crate::routes::feature::{FeatureRequest, Prompter};
use crate::routes::{Intent, Route};
use crate::state::ClientState;

pub const ASK_ERROR: &str = "⚠️ Error contacting server.";
pub const FEATURE_ERROR: &str = "⚠️ Error fetching data.";

/// Outcome of one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Nothing to send.
    Skipped,
    /// The user dismissed the parameter prompt.
    Cancelled,
    Answered { spoken: bool },
    Diagram { node: DiagramNode, rendered: bool },
    Failed,
    /// Voice capture ended without an utterance.
    Stopped,
}

/// The EduMate chat widget: turns user actions into backend requests and
/// renders the replies.
///
/// Every operation takes `&mut self`, so a client has at most one request
/// in flight and replies are appended in the order they were asked for.
pub struct ChatClient<B, V> {
    backend: B,
    view: V,
    speaker: Option<Box<dyn Speaker>>,
    diagrams: Option<Box<dyn DiagramRenderer>>,
    state: ClientState,
}

impl<B: Backend, V: ChatView> ChatClient<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        Self::with_state(backend, view, ClientState::default())
    }

    pub fn with_state(backend: B, view: V, state: ClientState) -> Self {
        info!(session_id = %state.session_id(), "chat session started");
        Self { backend, view, speaker: None, diagrams: None, state }
    }

    pub fn with_speaker(mut self, speaker: impl Speaker + 'static) -> Self {
        self.speaker = Some(Box::new(speaker));
        self
    }

    pub fn with_diagram_renderer(mut self, renderer: impl DiagramRenderer + 'static) -> Self {
        self.diagrams = Some(Box::new(renderer));
        self
    }

    pub fn session_id(&self) -> &SessionId {
        self.state.session_id()
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Ask a free-form question within this session.
    pub async fn send_message(&mut self, text: &str) -> Turn {
        let question = text.trim();
        if question.is_empty() {
            debug!("ignoring empty message");
            return Turn::Skipped;
        }

        self.view.append_message(&Message::user(question));

        let body = serde_json::to_value(AskRequest {
            question,
            session_id: self.state.session_id(),
        })
        .map_err(ClientError::from);
        let result = match body {
            Ok(body) => self.exchange(Intent::Ask.route(), Some(body)).await,
            Err(e) => Err(e),
        };
        let speak = self.state.take_voice();

        match result {
            Ok(resp) => {
                self.view.append_message(&Message::bot(resp.answer.as_str()));
                let spoken = speak && self.speak(&resp.answer);
                Turn::Answered { spoken }
            }
            Err(e) => {
                warn!(error = %e, "ask failed");
                self.view.append_message(&Message::bot(ASK_ERROR));
                Turn::Failed
            }
        }
    }

    /// Run one of the feature intents, prompting for its parameters first.
    pub async fn request_feature(
        &mut self,
        intent: Intent,
        prompter: &mut dyn Prompter,
    ) -> Result<Turn, ClientError> {
        let Some(request) = FeatureRequest::collect(intent, prompter).await? else {
            debug!(?intent, "feature prompt cancelled");
            return Ok(Turn::Cancelled);
        };

        self.view.append_message(&Message::user(request.status.as_str()));
        let result = self.exchange(intent.route(), request.body).await;
        let speak = self.state.take_voice();

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                warn!(?intent, error = %e, "feature request failed");
                self.view.append_message(&Message::bot(FEATURE_ERROR));
                return Ok(Turn::Failed);
            }
        };

        if intent == Intent::MindMap {
            return Ok(self.show_diagram(&resp.answer));
        }

        self.view.append_message(&Message::bot(resp.answer.as_str()));
        let spoken = speak && self.speak(&resp.answer);
        Ok(Turn::Answered { spoken })
    }

    /// Mic button: start listening, or stop a capture left running.
    /// A recognized utterance is sent as a message and its reply spoken.
    pub async fn capture_voice(&mut self, recognizer: &mut dyn Recognizer) -> Turn {
        if self.state.capture.toggle() == MicAction::Stop {
            recognizer.stop();
            self.state.take_voice();
            return Turn::Stopped;
        }

        self.state.activate_voice();
        let heard = recognizer.listen().await;
        self.state.capture.finish();

        match heard {
            Ok(Some(transcript)) => {
                let turn = self.send_message(&transcript).await;
                if turn == Turn::Skipped {
                    self.state.take_voice();
                }
                turn
            }
            Ok(None) => {
                debug!("no speech recognized");
                self.state.take_voice();
                Turn::Stopped
            }
            Err(e) => {
                warn!(error = %e, "speech recognition failed");
                self.state.take_voice();
                Turn::Stopped
            }
        }
    }

    async fn exchange(&mut self, route: Route, body: Option<Value>) -> Result<AnswerResponse, ClientError> {
        self.view.show_typing();
        let result = self.backend.call(route, body).await;
        self.view.remove_typing();
        result
    }

    fn show_diagram(&mut self, answer: &str) -> Turn {
        let source = strip_code_fences(answer);
        let node = self.view.append_diagram(&source);

        let rendered = match self.diagrams.as_mut() {
            Some(renderer) => match renderer.render(&node, &source) {
                Ok(()) => true,
                Err(e) => {
                    warn!(%node, error = %e, "mind map render error");
                    self.view.diagram_failed(&node, &e.to_string());
                    false
                }
            },
            None => false,
        };
        Turn::Diagram { node, rendered }
    }

    fn speak(&mut self, answer: &str) -> bool {
        match self.speaker.as_mut() {
            Some(speaker) => {
                speaker.speak(&speech_text(answer));
                true
            }
            None => false,
        }
    }
}
