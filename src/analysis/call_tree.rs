//! Call tree aggregation
//!
//! Turns a thread's sample list into a merged call tree with total/self
//! accounting:
//!
//! - **total**: samples passing through a node (the function was anywhere on
//!   the stack at that position in its ancestor chain),
//! - **self**: samples where the node was the leaf (actively executing).
//!
//! Two call paths merge into the same node iff they share the same function
//! identity at every position from the root. Unresolved frames keep one
//! identity per distinct address, so unrelated unsymbolicated code never
//! collapses into a single bucket.
//!
//! `build_tree` is a pure function of the thread's current samples and frame
//! table. It recomputes from scratch, so it is safe to call after every
//! incremental symbolication snapshot.

use crate::profile::Thread;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

/// One node of the merged call tree.
///
/// Invariant: `self_count + Σ(children.total) = total` for every node, and
/// children are ordered by descending `total` with ties broken by ascending
/// name, so output is stable across runs with identical input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallTreeNode {
    pub name: String,
    pub total: u64,
    #[serde(rename = "self")]
    pub self_count: u64,
    pub children: Vec<CallTreeNode>,
}

/// Mutable node used during construction; child lookup by identity is O(1).
struct BuildNode {
    name: String,
    total: u64,
    self_count: u64,
    children: Vec<BuildNode>,
    child_index: HashMap<String, usize>,
}

impl BuildNode {
    fn new(name: String) -> Self {
        Self { name, total: 0, self_count: 0, children: Vec::new(), child_index: HashMap::new() }
    }

    fn child(&mut self, name: &str) -> &mut BuildNode {
        let idx = match self.child_index.get(name) {
            Some(&idx) => idx,
            None => {
                self.children.push(BuildNode::new(name.to_string()));
                let idx = self.children.len() - 1;
                self.child_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.children[idx]
    }

    fn finalize(self) -> CallTreeNode {
        let mut children: Vec<CallTreeNode> =
            self.children.into_iter().map(BuildNode::finalize).collect();
        children.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        CallTreeNode { name: self.name, total: self.total, self_count: self.self_count, children }
    }
}

/// Build the merged call tree for one thread.
///
/// The root is synthetic (the empty stack); its `total` equals the thread's
/// sample count. Samples with an empty stack count into the root's `self`.
#[must_use]
pub fn build_tree(thread: &Thread) -> CallTreeNode {
    let mut root = BuildNode::new("(root)".to_string());

    for stack in thread.samples.iter() {
        root.total += 1;
        let mut node = &mut root;
        for &frame_id in &stack.0 {
            node = node.child(&thread.frames[frame_id].identity());
            node.total += 1;
        }
        node.self_count += 1;
    }

    root.finalize()
}

/// Render the tree as indented text, one line per node:
/// two spaces per depth level, then the total count and the name.
/// Nodes deeper than `depth_limit` are omitted.
#[must_use]
pub fn render(node: &CallTreeNode, depth_limit: usize) -> String {
    let mut out = String::new();
    render_into(node, 0, depth_limit, &mut out);
    out
}

fn render_into(node: &CallTreeNode, depth: usize, depth_limit: usize, out: &mut String) {
    if depth > depth_limit {
        return;
    }
    let _ = writeln!(out, "{}{} {}", "  ".repeat(depth), node.total, node.name);
    for child in &node.children {
        render_into(child, depth + 1, depth_limit, out);
    }
}
