//! Audited rendering of backend text.
//!
//! Backend answers are untrusted. All text is escaped; the only markup that
//! survives is `**bold**` and line breaks.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    LineBreak,
}

pub fn render_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            spans.push(Span::LineBreak);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);

        let mut last = 0;
        for caps in BOLD.captures_iter(line) {
            let whole = caps.get_match();
            if whole.start() > last {
                spans.push(Span::Text(line[last..whole.start()].to_string()));
            }
            spans.push(Span::Bold(caps[1].to_string()));
            last = whole.end();
        }
        if last < line.len() {
            spans.push(Span::Text(line[last..].to_string()));
        }
    }
    spans
}

pub fn to_html(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(t) => out.push_str(&escape_html(t)),
            Span::Bold(t) => {
                out.push_str("<b>");
                out.push_str(&escape_html(t));
                out.push_str("</b>");
            }
            Span::LineBreak => out.push_str("<br>"),
        }
    }
    out
}

pub fn to_terminal(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(t) => push_printable(&mut out, t),
            Span::Bold(t) => {
                out.push_str("\x1b[1m");
                push_printable(&mut out, t);
                out.push_str("\x1b[0m");
            }
            Span::LineBreak => out.push('\n'),
        }
    }
    out
}

/// Backend text may carry escape sequences; only tabs survive of the
/// control characters (line breaks are spans by now).
fn push_printable(out: &mut String, text: &str) {
    out.extend(text.chars().filter(|c| *c == '\t' || !c.is_control()));
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text handed to speech synthesis: no emphasis markers, no tags.
pub fn speech_text(answer: &str) -> String {
    TAG.replace_all(&answer.replace('*', ""), "").into_owned()
}

/// Drops the ```mermaid fences models like to wrap diagrams in.
pub fn strip_code_fences(source: &str) -> String {
    source.replace("```mermaid", "").replace("```", "").trim().to_string()
}
