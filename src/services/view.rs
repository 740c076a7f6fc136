//! Chat log presentation.
//!
//! The view is the only record of the conversation: messages are appended,
//! never edited, except for the transient typing placeholder.

use std::io::{self, Write};

use tracing::warn;

use super::diagram::{DiagramNode, RENDER_FAILED};
use super::render::{render_spans, to_terminal};
use crate::message::{Message, Sender};

pub trait ChatView: Send {
    fn append_message(&mut self, message: &Message);

    /// Show the placeholder. At most one is shown at a time.
    fn show_typing(&mut self);

    /// Remove the placeholder if present.
    fn remove_typing(&mut self);

    /// Create a fresh container holding the diagram source.
    fn append_diagram(&mut self, source: &str) -> DiagramNode;

    fn diagram_failed(&mut self, node: &DiagramNode, reason: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Message(Message),
    Typing,
    Diagram {
        node: DiagramNode,
        source: String,
        error: Option<String>,
    },
}

/// In-memory chat log.
#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    entries: Vec<LogEntry>,
    next_diagram: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn messages(&self) -> Vec<&Message> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LogEntry::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn is_typing(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, LogEntry::Typing))
    }
}

impl ChatView for ChatLog {
    fn append_message(&mut self, message: &Message) {
        self.entries.push(LogEntry::Message(message.clone()));
    }

    fn show_typing(&mut self) {
        if !self.is_typing() {
            self.entries.push(LogEntry::Typing);
        }
    }

    fn remove_typing(&mut self) {
        self.entries.retain(|e| !matches!(e, LogEntry::Typing));
    }

    fn append_diagram(&mut self, source: &str) -> DiagramNode {
        self.next_diagram += 1;
        let node = DiagramNode::new(self.next_diagram);
        self.entries.push(LogEntry::Diagram {
            node: node.clone(),
            source: source.to_string(),
            error: None,
        });
        node
    }

    fn diagram_failed(&mut self, node: &DiagramNode, reason: &str) {
        for entry in &mut self.entries {
            if let LogEntry::Diagram { node: n, error, .. } = entry {
                if n == node {
                    *error = Some(reason.to_string());
                }
            }
        }
    }
}

/// Writes the conversation to a terminal.
pub struct TerminalView {
    out: Box<dyn Write + Send>,
    typing: bool,
    next_diagram: u64,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl TerminalView {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out, typing: false, next_diagram: 0 }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write to terminal");
        }
    }
}

fn prefix(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "you › ",
        Sender::Bot => "edumate › ",
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, message: &Message) {
        let body = to_terminal(&render_spans(&message.text));
        let line = format!("{}{}\n", prefix(message.sender), body);
        self.write(&line);
    }

    fn show_typing(&mut self) {
        if !self.typing {
            self.typing = true;
            self.write("edumate › typing…\n");
        }
    }

    fn remove_typing(&mut self) {
        if self.typing {
            self.typing = false;
            // up onto the placeholder line and clear it
            self.write("\x1b[1A\r\x1b[2K");
        }
    }

    fn append_diagram(&mut self, _source: &str) -> DiagramNode {
        self.next_diagram += 1;
        let node = DiagramNode::new(self.next_diagram);
        let line = format!("{}[diagram {node}]\n", prefix(Sender::Bot));
        self.write(&line);
        node
    }

    fn diagram_failed(&mut self, node: &DiagramNode, reason: &str) {
        warn!(%node, reason, "diagram render failed");
        let line = format!("{}{}\n", prefix(Sender::Bot), to_terminal(&render_spans(RENDER_FAILED)));
        self.write(&line);
    }
}
