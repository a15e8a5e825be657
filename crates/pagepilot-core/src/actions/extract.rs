//! `extract`: pull typed data out of the page.

use std::sync::OnceLock;

use pagepilot_dom::{Document, NodeId};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::{trimmed_text, ActionContext, ActionOutcome};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("email regex")
    })
}

fn price_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\d+(?:\.\d{2})?|\d+(?:\.\d{2})?\s*(?:USD|EUR|GBP|JPY|CAD|AUD|CHF)")
            .expect("price regex")
    })
}

/// Items shown in a chat reply; the rest are counted.
const MAX_LISTED_ITEMS: usize = 15;
/// Smallest image dimension worth reporting.
const MIN_IMAGE_SIZE: u32 = 50;
/// Rows sampled per table.
const TABLE_SAMPLE_ROWS: usize = 4;
/// Keywords shorter than this are ignored by the class/id search.
const MIN_KEYWORD_LEN: usize = 3;

/// Extracted items with the label used when reporting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedData {
    pub data_type: String,
    pub items: Vec<String>,
}

impl ExtractedData {
    fn new(data_type: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            data_type: data_type.into(),
            items,
        }
    }
}

pub async fn extract(ctx: &mut ActionContext<'_>, data_type: &str) -> ActionOutcome {
    if data_type.trim().is_empty() {
        ctx.say("What kind of data would you like me to extract from this page?")
            .await;
        return ActionOutcome::Clarification;
    }

    let data = extract_data(ctx.document, data_type);
    debug!(data_type, items = data.items.len(), "Extraction complete");
    if data.items.is_empty() {
        ctx.say(format!("I couldn't find any {} on this page.", data_type))
            .await;
        return ActionOutcome::NoMatch;
    }
    ctx.say(format_extraction(&data)).await;
    ActionOutcome::Extracted(data)
}

/// Run the extractor for `data_type`: a built-in kind, or a description.
pub fn extract_data(doc: &Document, data_type: &str) -> ExtractedData {
    match data_type.to_lowercase().as_str() {
        "links" => ExtractedData::new("links", links(doc)),
        "images" => ExtractedData::new("images", images(doc)),
        "tables" => ExtractedData::new("tables", tables(doc)),
        "emails" => ExtractedData::new(
            "email addresses",
            unique_matches(&doc.rendered_text(doc.body()), email_regex()),
        ),
        "prices" => ExtractedData::new(
            "prices",
            unique_matches(&doc.rendered_text(doc.body()), price_regex()),
        ),
        _ => ExtractedData::new(data_type, custom(doc, data_type)),
    }
}

/// Chat rendering: numbered items, capped, with a count of the rest.
pub fn format_extraction(data: &ExtractedData) -> String {
    let mut response = format!("Here's the {} I extracted from this page:\n\n", data.data_type);
    for (i, item) in data.items.iter().take(MAX_LISTED_ITEMS).enumerate() {
        response.push_str(&format!("{}. {}\n", i + 1, item));
    }
    if data.items.len() > MAX_LISTED_ITEMS {
        response.push_str(&format!(
            "\n...and {} more items.",
            data.items.len() - MAX_LISTED_ITEMS
        ));
    }
    response
}

fn visible_by_tag(doc: &Document, tags: &[&str]) -> Vec<NodeId> {
    doc.elements_by_tag(doc.root(), tags)
        .into_iter()
        .filter(|&n| doc.is_visible(n))
        .collect()
}

fn links(doc: &Document) -> Vec<String> {
    visible_by_tag(doc, &["a"])
        .into_iter()
        .filter_map(|a| {
            let href = doc.attr(a, "href")?;
            let usable = !href.trim().is_empty()
                && !href.starts_with("javascript:")
                && !href.starts_with('#');
            usable.then(|| format!("{} - {}", trimmed_text(doc, a), doc.resolve_url(href)))
        })
        .collect()
}

/// Declared `width`/`height`; images without one are assumed large enough.
fn large_enough(doc: &Document, img: NodeId) -> bool {
    ["width", "height"].into_iter().all(|dim| {
        doc.attr(img, dim)
            .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
            .is_none_or(|size| size > MIN_IMAGE_SIZE)
    })
}

fn images(doc: &Document) -> Vec<String> {
    visible_by_tag(doc, &["img"])
        .into_iter()
        .filter(|&img| large_enough(doc, img))
        .map(|img| {
            let alt = doc.attr(img, "alt").filter(|a| !a.is_empty()).unwrap_or("Image");
            let src = doc.attr(img, "src").map(|s| doc.resolve_url(s)).unwrap_or_default();
            format!("{} - {}", alt, src)
        })
        .collect()
}

fn tables(doc: &Document) -> Vec<String> {
    visible_by_tag(doc, &["table"])
        .into_iter()
        .enumerate()
        .map(|(i, table)| {
            let headers: Vec<String> = doc
                .elements_by_tag(table, &["th"])
                .into_iter()
                .map(|th| trimmed_text(doc, th))
                .collect();
            let rows: Vec<String> = doc
                .elements_by_tag(table, &["tr"])
                .into_iter()
                .take(TABLE_SAMPLE_ROWS)
                .map(|tr| {
                    doc.elements_by_tag(tr, &["td"])
                        .into_iter()
                        .map(|td| trimmed_text(doc, td))
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .filter(|row| !row.is_empty())
                .collect();
            format!(
                "Table {}: [{}]\nSample: {}",
                i + 1,
                headers.join(" | "),
                rows.join("\n")
            )
        })
        .collect()
}

/// Every match of `re` in `text`, first occurrence order, exact-string
/// deduplication.
fn unique_matches(text: &str, re: &Regex) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        if !items.iter().any(|seen| seen == m.as_str()) {
            items.push(m.as_str().to_string());
        }
    }
    items
}

/// Heuristic extraction from a free-form description.
fn custom(doc: &Document, description: &str) -> Vec<String> {
    let lower = description.to_lowercase();

    if lower.contains("heading") || lower.contains("title") {
        return visible_by_tag(doc, &["h1", "h2", "h3", "h4", "h5", "h6"])
            .into_iter()
            .map(|h| trimmed_text(doc, h))
            .collect();
    }
    if lower.contains("paragraph") || lower.contains("text") {
        return visible_by_tag(doc, &["p"])
            .into_iter()
            .map(|p| trimmed_text(doc, p))
            .collect();
    }
    if lower.contains("button") {
        return doc
            .elements()
            .into_iter()
            .filter(|&n| is_button_like(doc, n) && doc.is_visible(n))
            .map(|n| {
                let text = trimmed_text(doc, n);
                if !text.is_empty() {
                    return text;
                }
                doc.attr(n, "value")
                    .filter(|v| !v.is_empty())
                    .unwrap_or("Button")
                    .to_string()
            })
            .collect();
    }
    if lower.contains("list") {
        return visible_by_tag(doc, &["ul", "ol"])
            .into_iter()
            .enumerate()
            .map(|(i, list)| {
                let items: Vec<String> = doc
                    .elements_by_tag(list, &["li"])
                    .into_iter()
                    .map(|li| trimmed_text(doc, li))
                    .collect();
                format!("List {}: {}", i + 1, items.join(", "))
            })
            .collect();
    }

    for keyword in description.split_whitespace() {
        if keyword.chars().count() < MIN_KEYWORD_LEN {
            continue;
        }
        let matching: Vec<NodeId> = doc
            .elements()
            .into_iter()
            .filter(|&n| {
                ["class", "id"]
                    .into_iter()
                    .any(|attr| doc.attr(n, attr).is_some_and(|v| v.contains(keyword)))
            })
            .collect();
        if !matching.is_empty() {
            return matching
                .into_iter()
                .filter(|&n| doc.is_visible(n))
                .map(|n| trimmed_text(doc, n))
                .collect();
        }
    }
    Vec::new()
}

/// `button, [role=button], .btn, input[type=button], input[type=submit]`
fn is_button_like(doc: &Document, id: NodeId) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    match el.tag.as_str() {
        "button" => true,
        "input" => el
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("button") || t.eq_ignore_ascii_case("submit")),
        _ => el.attr("role") == Some("button") || el.has_class("btn"),
    }
}
