// SPDX-License-Identifier: MPL-2.0

//! Option types and hierarchy flattening for the paged select engine.

/// Unique key for a selectable option.
pub type OptionValue = String;

/// A source record that can be turned into a selectable option and may
/// carry nested children.
///
/// Records arriving from a paged listing implement this so the engine can
/// flatten an arbitrarily nested response into a level-annotated flat list,
/// independent of the record's own shape.
pub trait TreeNode {
    /// Unique key for this record (becomes the option value).
    fn key(&self) -> OptionValue;

    /// Display text for this record.
    fn label(&self) -> &str;

    /// Nested child records, if any.
    fn children(&self) -> &[Self]
    where
        Self: Sized,
    {
        &[]
    }
}

/// A single selectable entry produced by flattening.
///
/// Generic over `R`, the source record the option was derived from.
/// Two options are considered equal when their values match.
#[derive(Debug, Clone)]
pub struct SelectOption<R> {
    /// Unique key for this option.
    pub value: OptionValue,
    /// Display label.
    pub label: String,
    /// Nesting depth; 0 for root-level records.
    pub level: usize,
    /// The source record this option was derived from.
    pub payload: R,
}

impl<R> PartialEq for SelectOption<R> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<R> Eq for SelectOption<R> {}

/// Flattens a forest of records into a leveled option list.
///
/// Traversal is pre-order depth-first: each record is emitted before its
/// children, children carry the parent's level plus one, and root order is
/// preserved. Records without children contribute only themselves.
pub fn flatten<R: TreeNode + Clone>(roots: &[R]) -> Vec<SelectOption<R>> {
    let mut out = Vec::new();
    for root in roots {
        push_subtree(root, 0, &mut out);
    }
    out
}

fn push_subtree<R: TreeNode + Clone>(node: &R, level: usize, out: &mut Vec<SelectOption<R>>) {
    out.push(SelectOption {
        value: node.key(),
        label: node.label().to_string(),
        level,
        payload: node.clone(),
    });
    for child in node.children() {
        push_subtree(child, level + 1, out);
    }
}
