//! Arena document: parsing, navigation, text access and mutation.

use tracing::debug;
use url::Url;

use crate::error::DomError;
use crate::node::{ElementData, Node, NodeData, NodeId};

/// Side effects a page would see from the assistant that are not tree
/// mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    /// The element was scrolled into the centre of the viewport.
    ScrollIntoView(NodeId),
    /// The element received a click.
    Click(NodeId),
}

/// A parsed page.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    url: String,
    base: Option<Url>,
    events: Vec<DomEvent>,
}

impl Document {
    /// Parse an HTML document. `url` is the page address used for
    /// resolving relative `href`/`src` values.
    pub fn parse(html: &str, url: &str) -> Self {
        let parsed = scraper::Html::parse_document(html);
        let mut doc = Self::empty(url);
        let root = doc.root;

        let mut stack: Vec<_> = parsed.tree.root().children().rev().map(|c| (c, root)).collect();
        while let Some((source, parent)) = stack.pop() {
            let data = match source.value() {
                scraper::Node::Element(el) => {
                    let mut data = ElementData::new(el.name());
                    for (name, value) in el.attrs() {
                        data.set_attr(name, value);
                    }
                    NodeData::Element(data)
                }
                scraper::Node::Text(text) => NodeData::Text(text.to_string()),
                scraper::Node::Comment(comment) => NodeData::Comment(comment.to_string()),
                _ => continue,
            };
            let id = doc.push(data);
            doc.append_child(parent, id);
            stack.extend(source.children().rev().map(|c| (c, id)));
        }

        debug!(url, nodes = doc.nodes.len(), "Parsed document");
        doc
    }

    fn empty(url: &str) -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            url: url.to_string(),
            base: Url::parse(url).ok(),
            events: Vec::new(),
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Page URL as given to [`Document::parse`].
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve a possibly relative URL against the page URL.
    pub fn resolve_url(&self, href: &str) -> String {
        match &self.base {
            Some(base) => base
                .join(href.trim())
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its ancestors up to the document node.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Whether the node is still attached to the document tree.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id).last() == Some(&self.root)
    }

    /// All elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root)
    }

    /// Element descendants of `id` in document order.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.element(n).is_some())
            .collect()
    }

    /// Element descendants of `scope` whose tag is one of `tags`, in document order.
    pub fn elements_by_tag(&self, scope: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.tag(n).is_some_and(|t| tags.contains(&t)))
            .collect()
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.tag(n) == Some(tag))
    }

    /// The `<body>` element, or the document node if the page has none.
    pub fn body(&self) -> NodeId {
        self.first_by_tag("body").unwrap_or(self.root)
    }

    /// Nearest ancestor-or-self element carrying `class`.
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .into_iter()
            .find(|&n| self.element(n).is_some_and(|el| el.has_class(class)))
    }

    /// `document.title`: the first `<title>`, whitespace collapsed.
    pub fn title(&self) -> String {
        self.first_by_tag("title")
            .map(|t| collapse_whitespace(&self.text_content(t)))
            .unwrap_or_default()
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeData::Text(text) = &self.node(id).data {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Text node descendants of `id` in document order.
    pub fn text_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.text(n).is_some())
            .collect()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_attr(name);
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Replace `id` in its parent with `replacements`, in order.
    pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) -> Result<(), DomError> {
        let parent = self.parent(id).ok_or(DomError::NodeNotFound(id.0))?;
        for &r in replacements {
            self.detach(r);
        }
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == id)
            .ok_or(DomError::NodeNotFound(id.0))?;
        self.nodes[parent.0]
            .children
            .splice(index..=index, replacements.iter().copied());
        for &r in replacements {
            self.nodes[r.0].parent = Some(parent);
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// `element.textContent = text`: drop all children and insert a single
    /// text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(existing) = &mut self.nodes[id.0].data {
            *existing = text.to_string();
            return;
        }
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Split a text node into before/match/after and wrap the byte range
    /// `start..end` in a new element. Returns the wrapper.
    pub fn split_text_and_wrap(
        &mut self,
        text_node: NodeId,
        start: usize,
        end: usize,
        wrapper: ElementData,
    ) -> Result<NodeId, DomError> {
        let content = self
            .text(text_node)
            .ok_or(DomError::NodeNotFound(text_node.0))?
            .to_string();
        if start >= end
            || end > content.len()
            || !content.is_char_boundary(start)
            || !content.is_char_boundary(end)
        {
            return Err(DomError::InvalidRange { start, end });
        }

        let mut replacements = Vec::with_capacity(3);
        if start > 0 {
            replacements.push(self.create_text(&content[..start]));
        }
        let wrap = self.create_element(wrapper);
        let inner = self.create_text(&content[start..end]);
        self.append_child(wrap, inner);
        replacements.push(wrap);
        if end < content.len() {
            replacements.push(self.create_text(&content[end..]));
        }

        self.replace_with(text_node, &replacements)?;
        Ok(wrap)
    }

    pub fn scroll_into_view(&mut self, id: NodeId) {
        self.events.push(DomEvent::ScrollIntoView(id));
    }

    pub fn click(&mut self, id: NodeId) {
        debug!(node = id.0, tag = ?self.tag(id), "Dispatching click");
        self.events.push(DomEvent::Click(id));
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn click_count(&self, id: NodeId) -> usize {
        self.events
            .iter()
            .filter(|e| **e == DomEvent::Click(id))
            .count()
    }
}

/// Trim and collapse runs of whitespace to a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
