//! The `[[action:target]]` command syntax embedded in model replies.
//!
//! A single left-to-right scan splits a reply into [`Token`]s. The same
//! scan backs both outputs: [`extract_commands`] collects the commands and
//! the unmatched remainder, [`render_segments`] turns the reply into text
//! and inline action triggers for display.
//!
//! Matching rules for a fragment starting at `[[`:
//! - the action runs to the first `:` on the same line and holds no `[[`
//!   or `]]` (and does not start with `[`),
//! - the target runs to the first `]]` after that colon on the same line,
//! - anything else is plain text, and scanning resumes one character later.
//!
//! Fragments whose action is not one of the five known kinds are consumed
//! as plain text.

use std::fmt;
use std::str::FromStr;

use pagepilot_dom::escape_html;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// The closed set of page actions a model may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Translate,
    Highlight,
    Click,
    Summarize,
    Extract,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Translate,
        ActionKind::Highlight,
        ActionKind::Click,
        ActionKind::Summarize,
        ActionKind::Extract,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Translate => "translate",
            ActionKind::Highlight => "highlight",
            ActionKind::Click => "click",
            ActionKind::Summarize => "summarize",
            ActionKind::Extract => "extract",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = AssistantError;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AssistantError::UnknownAction(s.to_string()))
    }
}

/// A decoded `[[action:target]]` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: ActionKind,
    pub target: String,
}

impl Command {
    pub fn new(action: ActionKind, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
        }
    }

    /// The wire form of this command.
    pub fn to_wire(&self) -> String {
        format!("{}{}:{}{}", OPEN, self.action, self.target, CLOSE)
    }
}

/// One piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Command(Command),
}

/// Commands found in a reply, plus the reply with those fragments removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub commands: Vec<Command>,
    pub remainder: String,
}

/// A display segment: literal text or an action trigger labelled by its
/// target. Activating a trigger dispatches the carried command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Trigger(Command),
}

impl Segment {
    pub fn label(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Trigger(command) => &command.target,
        }
    }
}

/// A syntactic `[[action:target]]` match starting at byte `start`.
struct Fragment<'a> {
    action: &'a str,
    target: &'a str,
    end: usize,
}

fn match_fragment(text: &str, start: usize) -> Option<Fragment<'_>> {
    let action_start = start + OPEN.len();
    let rest = &text[action_start..];
    let colon = rest.find([':', '\n']).filter(|&i| rest.as_bytes()[i] == b':')?;
    let action = &rest[..colon];
    // A delimiter inside the action means a later `[[` opens the real fragment.
    if action.starts_with('[') || action.contains(OPEN) || action.contains(CLOSE) {
        return None;
    }

    let target_start = action_start + colon + 1;
    let rest = &text[target_start..];
    let close = rest.find(CLOSE)?;
    if rest[..close].contains('\n') {
        return None;
    }
    Some(Fragment {
        action,
        target: &rest[..close],
        end: target_start + close + CLOSE.len(),
    })
}

/// Split `text` into text and command tokens, in order of appearance.
/// Adjacent text is merged into a single token.
pub fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(OPEN) {
        let start = pos + offset;
        match match_fragment(text, start) {
            Some(fragment) => {
                literal.push_str(&text[pos..start]);
                match fragment.action.parse::<ActionKind>() {
                    Ok(action) => {
                        if !literal.is_empty() {
                            tokens.push(Token::Text(std::mem::take(&mut literal)));
                        }
                        tokens.push(Token::Command(Command::new(action, fragment.target)));
                    }
                    Err(_) => literal.push_str(&text[start..fragment.end]),
                }
                pos = fragment.end;
            }
            None => {
                // `[` is one byte, so start + 1 is a char boundary.
                literal.push_str(&text[pos..start + 1]);
                pos = start + 1;
            }
        }
    }
    literal.push_str(&text[pos..]);
    if !literal.is_empty() {
        tokens.push(Token::Text(literal));
    }
    tokens
}

/// Collect every command in `text` and the text left over without them.
pub fn extract_commands(text: &str) -> Extraction {
    let mut extraction = Extraction::default();
    for token in scan(text) {
        match token {
            Token::Text(t) => extraction.remainder.push_str(&t),
            Token::Command(c) => extraction.commands.push(c),
        }
    }
    extraction
}

/// Display segments for a stored or live reply.
pub fn render_segments(text: &str) -> Vec<Segment> {
    scan(text)
        .into_iter()
        .map(|token| match token {
            Token::Text(t) => Segment::Text(t),
            Token::Command(c) => Segment::Trigger(c),
        })
        .collect()
}

/// Render a reply as HTML with `ai-action-button` triggers.
pub fn render_html(text: &str) -> String {
    render_segments(text)
        .iter()
        .map(|segment| match segment {
            Segment::Text(t) => escape_html(t),
            Segment::Trigger(c) => format!(
                r#"<button class="ai-action-button" data-action="{}" data-target="{}">{}</button>"#,
                c.action,
                escape_html(&c.target),
                escape_html(&c.target)
            ),
        })
        .collect()
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
