//! Page context snapshot sent with every chat request.

use std::collections::HashMap;

use pagepilot_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

const MAX_FORMS: usize = 5;
const MAX_INTERACTIVE: usize = 20;
/// Structured text shorter than this falls back to the region's full text.
const MIN_STRUCTURED_LEN: usize = 200;

/// Read-only summary of the page, rebuilt for every outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub title: String,
    pub url: String,
    pub meta_description: String,
    pub text_content: String,
    pub forms: Vec<FormInfo>,
    pub interactive_elements: Vec<InteractiveElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInfo {
    pub id: String,
    pub name: String,
    pub action: String,
    pub method: String,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub text: String,
    pub id: String,
    pub class: String,
    pub href: Option<String>,
    pub visible: bool,
}

impl PageContext {
    /// Snapshot `doc`, capping the page text at `text_limit` characters.
    pub fn build(doc: &Document, text_limit: usize) -> Self {
        let region = content_region(doc);
        let text = structured_text(doc, region);
        let text_content = if text.chars().count() > text_limit {
            let mut capped: String = text.chars().take(text_limit).collect();
            capped.push_str("...");
            capped
        } else {
            text
        };

        Self {
            title: doc.title(),
            url: doc.url().to_string(),
            meta_description: meta_content(doc, "description").unwrap_or_default(),
            text_content,
            forms: forms(doc).into_iter().take(MAX_FORMS).collect(),
            interactive_elements: interactive_elements(doc)
                .into_iter()
                .take(MAX_INTERACTIVE)
                .collect(),
        }
    }

    /// Pretty JSON as embedded in the chat prompt.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The primary content region: the first `main`, `article` or `.content`
/// element, else the body.
pub fn content_region(doc: &Document) -> NodeId {
    doc.first_by_tag("main")
        .or_else(|| doc.first_by_tag("article"))
        .or_else(|| {
            doc.elements()
                .into_iter()
                .find(|&n| doc.element(n).is_some_and(|el| el.has_class("content")))
        })
        .unwrap_or_else(|| doc.body())
}

/// Headings as `[Heading N] text` lines followed by paragraphs separated by
/// blank lines. Short results fall back to the region's whole text with one
/// sentence per line.
pub fn structured_text(doc: &Document, region: NodeId) -> String {
    let mut result = String::new();
    for heading in doc.elements_by_tag(region, &["h1", "h2", "h3", "h4", "h5", "h6"]) {
        let text = doc.text_content(heading);
        let text = text.trim();
        if let (false, Some(tag)) = (text.is_empty(), doc.tag(heading)) {
            result.push_str(&format!("[Heading {}] {}\n", &tag[1..], text));
        }
    }
    for paragraph in doc.elements_by_tag(region, &["p"]) {
        let text = doc.text_content(paragraph);
        let text = text.trim();
        if !text.is_empty() {
            result.push_str(text);
            result.push_str("\n\n");
        }
    }

    if result.encode_utf16().count() < MIN_STRUCTURED_LEN {
        let collapsed = doc
            .text_content(region)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        result = collapsed.split(". ").collect::<Vec<_>>().join(".\n");
    }
    result
}

/// `content` of the first `<meta name=...>`.
fn meta_content(doc: &Document, name: &str) -> Option<String> {
    doc.elements_by_tag(doc.root(), &["meta"])
        .into_iter()
        .find(|&m| doc.attr(m, "name") == Some(name))
        .and_then(|m| doc.attr(m, "content"))
        .map(str::to_string)
}

fn forms(doc: &Document) -> Vec<FormInfo> {
    doc.elements_by_tag(doc.root(), &["form"])
        .into_iter()
        .map(|form| {
            let action = doc
                .attr(form, "action")
                .filter(|a| !a.trim().is_empty())
                .map(|a| doc.resolve_url(a))
                .unwrap_or_else(|| doc.url().to_string());
            let method = match doc.attr(form, "method").map(str::to_ascii_lowercase) {
                Some(m) if m == "post" || m == "dialog" => m,
                _ => "get".to_string(),
            };
            let fields = doc
                .elements_by_tag(
                    form,
                    &["input", "select", "textarea", "button", "output", "object"],
                )
                .into_iter()
                .map(|field| field_info(doc, field))
                .collect();
            FormInfo {
                id: doc.attr(form, "id").unwrap_or("").to_string(),
                name: doc.attr(form, "name").unwrap_or("").to_string(),
                action,
                method,
                fields,
            }
        })
        .collect()
}

/// The DOM `type`, `name`, `id` and `placeholder` of a form control.
fn field_info(doc: &Document, field: NodeId) -> FieldInfo {
    let tag = doc.tag(field).unwrap_or("");
    let declared = doc.attr(field, "type").map(str::to_ascii_lowercase);
    let field_type = match tag {
        "input" => declared.unwrap_or_else(|| "text".to_string()),
        "button" => match declared.as_deref() {
            Some(t @ ("reset" | "button")) => t.to_string(),
            _ => "submit".to_string(),
        },
        "select" if doc.attr(field, "multiple").is_some() => "select-multiple".to_string(),
        "select" => "select-one".to_string(),
        "textarea" => "textarea".to_string(),
        "output" => "output".to_string(),
        _ => String::new(),
    };
    let placeholder = matches!(tag, "input" | "textarea")
        .then(|| doc.attr(field, "placeholder").unwrap_or("").to_string());
    FieldInfo {
        field_type,
        name: doc.attr(field, "name").unwrap_or("").to_string(),
        id: doc.attr(field, "id").unwrap_or("").to_string(),
        placeholder,
    }
}

fn interactive_elements(doc: &Document) -> Vec<InteractiveElement> {
    doc.elements()
        .into_iter()
        .filter(|&n| {
            matches!(doc.tag(n), Some("button") | Some("a")) || doc.attr(n, "role") == Some("button")
        })
        .map(|n| {
            let tag = doc.tag(n).unwrap_or("").to_string();
            let href = match (tag.as_str(), doc.attr(n, "href")) {
                ("a", Some(href)) => Some(doc.resolve_url(href)),
                _ => None,
            };
            InteractiveElement {
                text: doc.text_content(n).trim().to_string(),
                id: doc.attr(n, "id").unwrap_or("").to_string(),
                class: doc.attr(n, "class").unwrap_or("").to_string(),
                href,
                visible: doc.is_visible(n),
                element_type: tag,
            }
        })
        .filter(|el| !el.text.is_empty() && el.visible)
        .collect()
}

/// Guess the page topic: the three most frequent words longer than three
/// characters across the title, meta keywords, meta description and `h1`s.
pub fn infer_page_topic(doc: &Document) -> Option<String> {
    let mut signals = vec![
        doc.title(),
        meta_content(doc, "keywords").unwrap_or_default(),
        meta_content(doc, "description").unwrap_or_default(),
    ];
    signals.extend(
        doc.elements_by_tag(doc.root(), &["h1"])
            .into_iter()
            .map(|h| doc.text_content(h).trim().to_string()),
    );
    let joined = signals
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in cleaned.split_whitespace().filter(|w| w.chars().count() > 3) {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }
    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    let top: Vec<&str> = order.into_iter().take(3).collect();
    (!top.is_empty()).then(|| top.join(", "))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
