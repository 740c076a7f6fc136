// src/services/diagram.rs
use std::fmt;

use crate::error::DiagramError;

pub const RENDER_FAILED: &str = "⚠️ **Could not render diagram.**\nThe AI generated invalid syntax.";

const KNOWN_KINDS: [&str; 11] = [
    "graph",
    "flowchart",
    "mindmap",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "erDiagram",
    "gantt",
    "pie",
    "journey",
    "timeline",
];

/// Handle to one diagram container in the chat view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramNode {
    pub id: String,
}

impl DiagramNode {
    pub fn new(seq: u64) -> Self {
        Self { id: format!("mermaid-{seq}") }
    }
}

impl fmt::Display for DiagramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Renders a single diagram node. Implementations must only touch the node
/// they are given; previously rendered diagrams are never re-rendered.
pub trait DiagramRenderer: Send {
    fn render(&mut self, node: &DiagramNode, source: &str) -> Result<(), DiagramError>;
}

/// First keyword of the diagram source, if it names a known diagram type.
pub fn validate(source: &str) -> Result<&str, DiagramError> {
    let first = source
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(DiagramError::Empty)?;
    let keyword = first.split_whitespace().next().unwrap_or(first);
    // stateDiagram-v2 and friends
    let base = keyword.split('-').next().unwrap_or(keyword);
    if KNOWN_KINDS.contains(&base) {
        Ok(keyword)
    } else {
        Err(DiagramError::UnknownKind(keyword.to_string()))
    }
}

/// Prints diagram source indented under its node id.
#[derive(Debug, Default)]
pub struct TerminalDiagramRenderer;

impl DiagramRenderer for TerminalDiagramRenderer {
    fn render(&mut self, node: &DiagramNode, source: &str) -> Result<(), DiagramError> {
        let kind = validate(source)?;
        println!("┌─ {kind} ({node})");
        for line in source.lines() {
            println!("│ {line}");
        }
        println!("└─");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds() {
        assert_eq!(validate("mindmap\n  root((Cells))").unwrap(), "mindmap");
        assert_eq!(validate("\n  graph TD\n A-->B").unwrap(), "graph");
        assert_eq!(validate("stateDiagram-v2\n[*] --> A").unwrap(), "stateDiagram-v2");
    }

    #[test]
    fn rejects_prose_and_empty() {
        assert!(matches!(validate("   \n "), Err(DiagramError::Empty)));
        assert!(matches!(
            validate("Here is your mind map:\nmindmap"),
            Err(DiagramError::UnknownKind(k)) if k == "Here"
        ));
    }

    #[test]
    fn node_ids() {
        assert_eq!(DiagramNode::new(7).id, "mermaid-7");
    }
}
