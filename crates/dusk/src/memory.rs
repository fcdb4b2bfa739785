//! An in-memory host document.
//!
//! [`MemoryDocument`] implements [`Document`] and [`EventLoop`] over a plain
//! node arena with a virtual clock. Computed colors are whatever was set on
//! each node; there is no cascade. It records everything the engine does to
//! it (stylesheet writes, observers, timers) so tests and offline tools can
//! drive the engine deterministically.
//!
//! ```rust
//! use std::time::Duration;
//! use dusk::{Engine, EngineConfig, MemoryDocument};
//!
//! let mut doc = MemoryDocument::html();
//! let mut engine = Engine::new();
//! engine.enable(&mut doc, EngineConfig::default());
//!
//! let body = doc.body_id().unwrap();
//! let card = doc.append_element(body, "div");
//! doc.set_background(card, "#fafafa");
//!
//! // Deliver the insertion, then let the batch window elapse
//! doc.advance(&mut engine, Duration::from_millis(500));
//! assert_eq!(engine.override_count(), 1);
//! ```

use std::mem;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::HostError;
use crate::host::{ComputedColors, Document, ElementRole, EventLoop, NodeKind, TimerId};

/// Handle to a node of a [`MemoryDocument`].
///
/// Only the document that created a handle should be queried with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Content {
    Element(String),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    content: Content,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    colors: ComputedColors,
    failing: bool,
}

impl MemoryNode {
    fn new(content: Content) -> Self {
        Self {
            content,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
            colors: ComputedColors::default(),
            failing: false,
        }
    }
}

/// Arena-backed document with a virtual clock.
///
/// Nodes are never freed, so every [`NodeId`] it hands out stays valid.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    root: Option<NodeId>,
    body: Option<NodeId>,
    color_scheme: Option<String>,
    styles: Vec<(String, String)>,
    style_writes: usize,
    observers: usize,
    insertions: Vec<NodeId>,
    clock: Duration,
    timers: Vec<(TimerId, Duration)>,
    next_timer: u64,
}

impl MemoryDocument {
    /// An empty document with no root element.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with an `html` root and an empty `body`.
    pub fn html() -> Self {
        let mut doc = Self::new();
        let html = doc.create_element("html");
        doc.set_root(html);
        let body = doc.append_element(html, "body");
        doc.set_body(body);
        doc
    }

    // ─── Tree construction ──────────────────────────────────────────────

    fn push(&mut self, content: Content) -> NodeId {
        self.nodes.push(MemoryNode::new(content));
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &MemoryNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut MemoryNode {
        &mut self.nodes[id.0]
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Content::Element(tag.to_ascii_lowercase()))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Content::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Content::Comment(text.to_string()))
    }

    /// Appends `child` under `parent`, reporting the insertion if observed.
    ///
    /// A node keeps the first parent it was appended to.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent.get_or_insert(parent);
        if self.observers > 0 {
            self.insertions.push(child);
        }
    }

    /// Makes `node` reachable from a second parent without detaching it.
    pub fn alias_child(&mut self, parent: NodeId, node: NodeId) {
        self.append_child(parent, node);
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let child = self.create_text(text);
        self.append_child(parent, child);
        child
    }

    pub fn set_root(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    pub fn set_body(&mut self, node: NodeId) {
        self.body = Some(node);
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn body_id(&self) -> Option<NodeId> {
        self.body
    }

    /// Tag name of an element node.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).content {
            Content::Element(tag) => Some(tag),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    // ─── Styles ─────────────────────────────────────────────────────────

    pub fn set_background(&mut self, node: NodeId, color: &str) {
        self.node_mut(node).colors.background = Some(color.to_string());
    }

    pub fn set_text_color(&mut self, node: NodeId, color: &str) {
        self.node_mut(node).colors.text = Some(color.to_string());
    }

    pub fn set_border_color(&mut self, node: NodeId, color: &str) {
        self.node_mut(node).colors.border = Some(color.to_string());
    }

    /// Makes every style query on `node` fail.
    pub fn fail_style_queries(&mut self, node: NodeId) {
        self.node_mut(node).failing = true;
    }

    pub fn set_color_scheme(&mut self, hint: Option<&str>) {
        self.color_scheme = hint.map(str::to_string);
    }

    /// Current text of a managed stylesheet.
    pub fn style_text(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(sid, _)| sid == id)
            .map(|(_, text)| text.as_str())
    }

    /// Number of managed stylesheets present.
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Total number of stylesheet writes so far.
    pub fn style_writes(&self) -> usize {
        self.style_writes
    }

    // ─── Event loop ─────────────────────────────────────────────────────

    pub fn is_observing(&self) -> bool {
        self.observers > 0
    }

    /// Number of connected insertion observers.
    pub fn observer_connections(&self) -> usize {
        self.observers
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn timer_ids(&self) -> Vec<TimerId> {
        self.timers.iter().map(|(id, _)| *id).collect()
    }

    /// Absolute virtual-clock deadlines of pending timers.
    pub fn timer_deadlines(&self) -> Vec<Duration> {
        self.timers.iter().map(|(_, at)| *at).collect()
    }

    /// Delivers recorded insertions to `engine` as one notification.
    pub fn flush_insertions(&mut self, engine: &mut Engine<NodeId>) {
        if self.insertions.is_empty() {
            return;
        }
        let batch = mem::take(&mut self.insertions);
        engine.nodes_inserted(self, &batch);
    }

    /// Delivers insertions, then moves the clock forward by `by`, firing due
    /// timers in deadline order. Returns how many timers fired.
    pub fn advance(&mut self, engine: &mut Engine<NodeId>, by: Duration) -> usize {
        self.flush_insertions(engine);
        let target = self.clock + by;
        let mut fired = 0;

        while let Some(index) = self.next_due(target) {
            let (timer, deadline) = self.timers.remove(index);
            self.clock = deadline;
            engine.timer_fired(self, timer);
            fired += 1;
            self.flush_insertions(engine);
        }

        self.clock = target;
        fired
    }

    fn next_due(&self, target: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, (_, at))| *at <= target)
            .min_by_key(|(_, (id, at))| (*at, *id))
            .map(|(index, _)| index)
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        self.body
    }

    fn node_kind(&self, node: NodeId) -> NodeKind {
        match &self.node(node).content {
            Content::Element(tag) => NodeKind::Element(ElementRole::from_tag(tag)),
            Content::Text(_) => NodeKind::Text,
            Content::Comment(_) => NodeKind::Comment,
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.node(node).attributes.clone()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attributes = &mut self.node_mut(node).attributes;
        match attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.node_mut(node)
            .attributes
            .retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    fn computed_colors(&self, node: NodeId) -> Result<ComputedColors, HostError> {
        let node = self.node(node);
        if node.failing {
            return Err(HostError::Style("injected failure".into()));
        }
        Ok(node.colors.clone())
    }

    fn color_scheme_hint(&self) -> Option<String> {
        self.color_scheme.clone()
    }

    fn write_style(&mut self, id: &str, text: &str) {
        self.style_writes += 1;
        match self.styles.iter_mut().find(|(sid, _)| sid == id) {
            Some((_, existing)) => *existing = text.to_string(),
            None => self.styles.push((id.to_string(), text.to_string())),
        }
    }

    fn remove_style(&mut self, id: &str) -> bool {
        let before = self.styles.len();
        self.styles.retain(|(sid, _)| sid != id);
        self.styles.len() != before
    }
}

impl EventLoop for MemoryDocument {
    fn observe_insertions(&mut self) {
        self.observers += 1;
    }

    fn disconnect_observer(&mut self) {
        self.observers = self.observers.saturating_sub(1);
        if self.observers == 0 {
            self.insertions.clear();
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push((id, self.clock + delay));
        id
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.timers.retain(|(id, _)| *id != timer);
    }
}
