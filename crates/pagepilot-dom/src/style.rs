//! Inline styles and visibility heuristics.
//!
//! Without a layout engine, computed style is approximated from inline
//! `style` attributes, the `hidden` attribute and user-agent defaults for
//! elements that never render.

use crate::document::Document;
use crate::node::{NodeData, NodeId};

/// Elements that never produce a box.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "title", "meta", "link", "base", "script", "style", "template", "noscript",
];

/// Elements that have an intrinsic size even when empty.
const REPLACED_TAGS: &[&str] = &[
    "img", "input", "button", "textarea", "select", "video", "audio", "canvas", "iframe",
    "svg", "object", "embed", "hr",
];

/// Parsed `style` attribute, declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    decls: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(source: &str) -> Self {
        let decls = source
            .split(';')
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim().to_ascii_lowercase();
                let value = value.trim().trim_end_matches("!important").trim();
                (!prop.is_empty()).then(|| (prop, value.to_string()))
            })
            .collect();
        Self { decls }
    }

    /// Value of the last declaration for `prop`.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .rev()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set or, with an empty value, remove a declaration.
    pub fn set(&mut self, prop: &str, value: &str) {
        self.decls.retain(|(p, _)| p != prop);
        if !value.is_empty() {
            self.decls.push((prop.to_string(), value.to_string()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl std::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.decls.iter().map(|(p, v)| format!("{}: {};", p, v)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// `0`, `0px`, `0.0em`, ...
fn is_zero_length(value: &str) -> bool {
    let numeric: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();
    numeric.parse::<f64>().map(|v| v == 0.0).unwrap_or(false)
}

fn is_nonzero_length(value: &str) -> bool {
    let numeric: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
}

impl Document {
    pub fn inline_style(&self, id: NodeId) -> InlineStyle {
        self.attr(id, "style").map(InlineStyle::parse).unwrap_or_default()
    }

    /// Inline value of a style property (`element.style[prop]`), empty if unset.
    pub fn style_property(&self, id: NodeId, prop: &str) -> String {
        self.inline_style(id).get(prop).unwrap_or("").to_string()
    }

    /// Set an inline style property; an empty value removes it.
    pub fn set_style_property(&mut self, id: NodeId, prop: &str, value: &str) {
        let mut style = self.inline_style(id);
        style.set(prop, value);
        if style.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            self.set_attribute(id, "style", &style.to_string());
        }
    }

    /// Whether the element itself suppresses its box.
    fn suppresses_box(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if NON_RENDERED_TAGS.contains(&el.tag.as_str()) || el.has_attr("hidden") {
            return true;
        }
        if el.tag == "input"
            && el
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return true;
        }
        self.inline_style(id)
            .get("display")
            .is_some_and(|d| d.eq_ignore_ascii_case("none"))
    }

    /// Whether the node takes part in rendering: no ancestor-or-self is
    /// `display: none`, `hidden`, or a never-rendered element.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.is_connected(id)
            && !self
                .ancestors_inclusive(id)
                .into_iter()
                .any(|n| self.suppresses_box(n))
    }

    /// Inherited `visibility`, resolved from the nearest inline declaration.
    fn is_visibility_hidden(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id)
            .into_iter()
            .find_map(|n| {
                self.inline_style(n)
                    .get("visibility")
                    .map(|v| v.to_ascii_lowercase())
            })
            .is_some_and(|v| v == "hidden" || v == "collapse")
    }

    fn is_transparent(&self, id: NodeId) -> bool {
        self.inline_style(id)
            .get("opacity")
            .and_then(|o| o.parse::<f64>().ok())
            .is_some_and(|o| o == 0.0)
    }

    /// Whether a rendered element would have non-zero width and height.
    pub fn has_box(&self, id: NodeId) -> bool {
        let style = self.inline_style(id);
        let width = style.get("width");
        let height = style.get("height");
        if width.is_some_and(is_zero_length) || height.is_some_and(is_zero_length) {
            return false;
        }
        if self.tag(id).is_some_and(|t| REPLACED_TAGS.contains(&t)) {
            return true;
        }
        if width.is_some_and(is_nonzero_length) && height.is_some_and(is_nonzero_length) {
            return true;
        }
        self.has_rendered_content(id)
    }

    fn has_rendered_content(&self, id: NodeId) -> bool {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        while let Some(n) = stack.pop() {
            match self.data(n) {
                NodeData::Text(text) if !text.trim().is_empty() => return true,
                NodeData::Element(el) => {
                    if self.suppresses_box(n) {
                        continue;
                    }
                    if REPLACED_TAGS.contains(&el.tag.as_str()) && self.has_box(n) {
                        return true;
                    }
                    stack.extend(self.children(n).iter().copied());
                }
                _ => {}
            }
        }
        false
    }

    /// Rendered, not `visibility: hidden`, opacity not 0, non-zero box.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.element(id).is_some()
            && self.is_rendered(id)
            && !self.is_visibility_hidden(id)
            && !self.is_transparent(id)
            && self.has_box(id)
    }

    /// `element.offsetParent !== null`: rendered, not `position: fixed`,
    /// and not the root or body element.
    pub fn has_offset_parent(&self, id: NodeId) -> bool {
        if matches!(self.tag(id), Some("html") | Some("body") | None) {
            return false;
        }
        let fixed = self
            .inline_style(id)
            .get("position")
            .is_some_and(|p| p.eq_ignore_ascii_case("fixed"));
        !fixed && self.is_rendered(id)
    }

    /// Approximation of `element.innerText`: rendered text only, block
    /// boundaries become line breaks, blank lines dropped.
    pub fn rendered_text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        self.collect_rendered_text(id, &mut raw);
        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect_rendered_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Text(text) => {
                if !self.parent(id).is_some_and(|p| self.is_visibility_hidden(p)) {
                    out.push_str(text);
                }
            }
            NodeData::Element(el) => {
                if self.suppresses_box(id) {
                    return;
                }
                if el.tag == "br" {
                    out.push('\n');
                    return;
                }
                let block = is_block(&el.tag);
                if block {
                    out.push('\n');
                }
                for &child in self.children(id) {
                    self.collect_rendered_text(child, out);
                }
                if block {
                    out.push('\n');
                } else if matches!(el.tag.as_str(), "td" | "th") {
                    out.push('\t');
                }
            }
            NodeData::Document => {
                for &child in self.children(id) {
                    self.collect_rendered_text(child, out);
                }
            }
            NodeData::Comment(_) => {}
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "address" | "article" | "aside" | "blockquote" | "body" | "dd" | "details" | "div"
            | "dl" | "dt" | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "h1"
            | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hr" | "html" | "li" | "main"
            | "nav" | "ol" | "p" | "pre" | "section" | "summary" | "table" | "tr" | "ul"
    )
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod tests;
