//! Structured diagnostic dumps
//!
//! A [`DumpNode`] is a labelled tree of values. Failures write themselves into
//! one through [`Dumpable`], nesting each cause as a `Cause` child, so the
//! whole cause graph can be inspected or serialized at once.

use serde::{Deserialize, Serialize};

/// Label of a nested cause dump
pub const CAUSE_LABEL: &str = "Cause";

/// One node of a structured dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpNode {
    /// Node label
    pub label: String,
    /// Value, for leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Nested nodes, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DumpNode>,
    #[serde(skip, default = "include_by_default")]
    include_technical: bool,
}

fn include_by_default() -> bool {
    true
}

impl DumpNode {
    /// Empty node that accepts technical sections
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            children: Vec::new(),
            include_technical: true,
        }
    }

    /// Empty node whose technical sections are suppressed, recursively
    #[inline]
    #[must_use]
    pub fn without_technical(label: impl Into<String>) -> Self {
        Self {
            include_technical: false,
            ..Self::new(label)
        }
    }

    /// Append a `(label, value)` leaf
    pub fn dump(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let mut leaf = self.child_node(label);
        leaf.value = Some(value.into());
        self.children.push(leaf);
        self
    }

    /// Append an unlabelled value, e.g. one line of a trace
    pub fn dump_line(&mut self, value: impl Into<String>) -> &mut Self {
        self.dump(String::new(), value)
    }

    /// Append a nested section and return it
    pub fn open(&mut self, label: impl Into<String>) -> &mut DumpNode {
        let section = self.child_node(label);
        self.children.push(section);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a technical section; `None` when technical details are suppressed
    pub fn open_technical(&mut self, label: impl Into<String>) -> Option<&mut DumpNode> {
        if self.include_technical {
            Some(self.open(label))
        } else {
            None
        }
    }

    /// Append a nested dump of `value` under `label`
    pub fn dump_nested(&mut self, label: impl Into<String>, value: &dyn Dumpable) -> &mut Self {
        value.dump(self.open(label));
        self
    }

    /// First direct child with `label`
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&DumpNode> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Value of the first direct child with `label`
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.child(label).and_then(|c| c.value.as_deref())
    }

    /// Number of failure levels: this node plus the deepest chain of nested `Cause` nodes
    #[must_use]
    pub fn failure_depth(&self) -> usize {
        1 + self.max_cause_depth()
    }

    fn max_cause_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| {
                if c.label == CAUSE_LABEL {
                    c.failure_depth()
                } else {
                    c.max_cause_depth()
                }
            })
            .max()
            .unwrap_or(0)
    }

    fn child_node(&self, label: impl Into<String>) -> DumpNode {
        DumpNode {
            include_technical: self.include_technical,
            ..DumpNode::new(label)
        }
    }
}

/// Types that write themselves into a [`DumpNode`]
pub trait Dumpable {
    /// Write entries into `node`
    fn dump(&self, node: &mut DumpNode);

    /// Dump into a fresh root node
    fn to_dump(&self) -> DumpNode {
        let mut node = DumpNode::new("Dump");
        self.dump(&mut node);
        node
    }
}
