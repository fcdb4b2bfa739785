//! Tree scanning and per-element override records.
//!
//! [`Scanner`] walks a subtree depth-first with an explicit stack, samples
//! each visual element's computed colors, runs the [`Policy`], and records an
//! [`OverrideRecord`] for every element that needs at least one change.
//!
//! The scanner remembers every element it has visited during the session, so
//! rescanning a subtree (or reaching the same node twice through an aliased
//! reference) never produces a second record. Records are kept in the order
//! their identifiers were assigned.
//!
//! Identifiers are written to the element as [`ID_ATTRIBUTE`] so the
//! generated stylesheet can target it. [`Scanner::release`] strips them again.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use log::{trace, warn};

use crate::host::{Document, ElementRole, NodeKind};
use crate::policy::{Declarations, Policy};

/// Attribute carrying an element's override identifier.
pub const ID_ATTRIBUTE: &str = "data-dusk-id";

/// Prefix of every minted identifier; the rest is a decimal counter.
pub const ID_PREFIX: &str = "dusk-";

/// The declarations computed for one element, keyed by its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideRecord {
    pub id: String,
    pub declarations: Declarations,
}

impl OverrideRecord {
    /// CSS selector targeting the element.
    pub fn selector(&self) -> String {
        format!("[{}=\"{}\"]", ID_ATTRIBUTE, self.id)
    }
}

/// Per-session traversal state: visited elements and assigned overrides.
pub struct Scanner<N> {
    processed: HashSet<N>,
    records: Vec<OverrideRecord>,
    owners: HashMap<String, N>,
    stray: Vec<N>,
    next_id: u64,
}

impl<N> fmt::Debug for Scanner<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("processed", &self.processed.len())
            .field("records", &self.records.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<N> Default for Scanner<N> {
    fn default() -> Self {
        Self {
            processed: HashSet::new(),
            records: Vec::new(),
            owners: HashMap::new(),
            stray: Vec::new(),
            next_id: 0,
        }
    }
}

impl<N: Copy + Eq + Hash + fmt::Debug> Scanner<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records of the session, in assignment order.
    pub fn records(&self) -> &[OverrideRecord] {
        &self.records
    }

    pub fn is_processed(&self, node: N) -> bool {
        self.processed.contains(&node)
    }

    /// Scans the subtree rooted at `root` and returns the records created by
    /// this call only. An empty result means nothing changed.
    ///
    /// Non-element nodes are skipped. Non-visual elements are skipped along
    /// with their content, including a `root` that sits inside one.
    /// Already-visited elements are skipped along with their subtree. A host
    /// failure on one element is logged and the walk continues with its
    /// children and siblings.
    ///
    /// An identifier attribute left on an element that ends up without a
    /// record is removed, so it cannot match another element's rule.
    pub fn scan<D>(&mut self, doc: &mut D, root: N, policy: &Policy) -> Vec<OverrideRecord>
    where
        D: Document<Node = N>,
    {
        if let Some(container) = non_visual_ancestor(&*doc, root) {
            trace!("skipping {:?} inside non-visual {:?}", root, container);
            return Vec::new();
        }

        let first_new = self.records.len();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if doc.node_kind(node) != NodeKind::Element(ElementRole::Visual) {
                continue;
            }
            if !self.processed.insert(node) {
                continue;
            }

            let declarations = match doc.computed_colors(node) {
                Ok(colors) => policy.evaluate(&colors),
                Err(err) => {
                    warn!("skipping {:?}: {}", node, err);
                    Declarations::default()
                }
            };
            if declarations.is_empty() {
                self.drop_stray_id(doc, node);
            } else {
                let id = self.claim_id(doc, node);
                trace!("override {} for {:?}: {:?}", id, node, declarations);
                self.records.push(OverrideRecord { id, declarations });
            }

            // Reverse so the leftmost child is visited first
            stack.extend(doc.children(node).into_iter().rev());
        }

        self.records[first_new..].to_vec()
    }

    /// Reuses a well-formed identifier already on the element when no other
    /// element holds it this session; otherwise mints the next free one.
    fn claim_id<D>(&mut self, doc: &mut D, node: N) -> String
    where
        D: Document<Node = N>,
    {
        if let Some(existing) = doc.attribute(node, ID_ATTRIBUTE) {
            if is_well_formed(&existing) && !self.owners.contains_key(&existing) {
                self.owners.insert(existing.clone(), node);
                return existing;
            }
        }

        let id = loop {
            let candidate = format!("{}{}", ID_PREFIX, self.next_id);
            self.next_id += 1;
            if !self.owners.contains_key(&candidate) {
                break candidate;
            }
        };
        doc.set_attribute(node, ID_ATTRIBUTE, &id);
        self.owners.insert(id.clone(), node);
        id
    }

    fn drop_stray_id<D>(&mut self, doc: &mut D, node: N)
    where
        D: Document<Node = N>,
    {
        if let Some(stale) = doc.attribute(node, ID_ATTRIBUTE) {
            trace!("dropping stale identifier {:?} from {:?}", stale, node);
            doc.remove_attribute(node, ID_ATTRIBUTE);
            self.stray.push(node);
        }
    }

    /// Removes every identifier this session wrote or found and forgets all
    /// state.
    pub fn release<D>(self, doc: &mut D)
    where
        D: Document<Node = N>,
    {
        for node in self.owners.into_values().chain(self.stray) {
            doc.remove_attribute(node, ID_ATTRIBUTE);
        }
    }
}

/// The nearest non-visual element above `node`, if any.
fn non_visual_ancestor<D: Document>(doc: &D, node: D::Node) -> Option<D::Node> {
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        if doc.node_kind(ancestor) == NodeKind::Element(ElementRole::NonVisual) {
            return Some(ancestor);
        }
        current = doc.parent(ancestor);
    }
    None
}

fn is_well_formed(id: &str) -> bool {
    id.strip_prefix(ID_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
