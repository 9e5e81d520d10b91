//! Search filtering for the options tree.
//!
//! A category whose label matches shows all of its items, and an item that
//! matches keeps its category visible while hiding non-matching siblings.

use crate::options::{NodeId, OptionTree};

fn matches(label: &str, needle: &str) -> bool {
    label.to_lowercase().contains(needle)
}

/// Whether `node` should be shown for `search_term`.
///
/// An empty term shows everything. Otherwise a node is visible if its own
/// label, its parent's label, or any child's label contains the term,
/// ignoring case. Unknown nodes are never visible.
pub fn is_visible(tree: &OptionTree, node: NodeId, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    let needle = search_term.to_lowercase();

    let Some(label) = tree.label(node) else {
        return false;
    };
    if matches(label, &needle) {
        return true;
    }

    if let Some(parent) = tree.parent(node)
        && let Some(parent_label) = tree.label(parent)
        && matches(parent_label, &needle)
    {
        return true;
    }

    tree.children(node)
        .into_iter()
        .filter_map(|child| tree.label(child))
        .any(|child_label| matches(child_label, &needle))
}

/// All nodes visible for `search_term`, in display order.
pub fn visible_nodes(tree: &OptionTree, search_term: &str) -> Vec<NodeId> {
    let visible: Vec<NodeId> = tree
        .nodes()
        .into_iter()
        .filter(|&id| is_visible(tree, id, search_term))
        .collect();
    tracing::trace!(
        term = search_term,
        visible = visible.len(),
        total = tree.len(),
        "refiltered options"
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogEntry};

    fn tree() -> OptionTree {
        OptionTree::from_catalog(&Catalog::new(vec![
            CatalogEntry::new("Firefox", &["Cache", "History"]),
            CatalogEntry::new("System", &["Logs"]),
        ]))
        .unwrap()
    }

    #[test]
    fn empty_term_shows_everything() {
        let t = tree();
        assert_eq!(visible_nodes(&t, ""), t.nodes());
    }

    #[test]
    fn sibling_of_matching_item_is_hidden() {
        let t = tree();
        assert!(is_visible(&t, NodeId::Item(0, 0), "cache"));
        assert!(is_visible(&t, NodeId::Category(0), "cache"));
        assert!(!is_visible(&t, NodeId::Item(0, 1), "cache"));
    }

    #[test]
    fn disabled_nodes_still_match() {
        let mut t = tree();
        t.toggle(NodeId::Category(1));
        assert!(is_visible(&t, NodeId::Category(1), "logs"));
        assert!(is_visible(&t, NodeId::Item(1, 0), "logs"));
    }

    #[test]
    fn unicode_case_folding() {
        let t = OptionTree::from_catalog(&Catalog::new(vec![CatalogEntry::new(
            "Ärzte",
            &["Überblick"],
        )]))
        .unwrap();
        assert!(is_visible(&t, NodeId::Item(0, 0), "üBER"));
        assert!(is_visible(&t, NodeId::Item(0, 0), "ÄR"));
    }

    #[test]
    fn unknown_node_is_hidden() {
        let t = tree();
        assert!(!is_visible(&t, NodeId::Item(3, 0), "x"));
        assert!(is_visible(&t, NodeId::Item(3, 0), ""));
    }
}
