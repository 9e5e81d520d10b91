use scour_core::catalog::{Catalog, CatalogEntry};
use scour_core::filter::{is_visible, visible_nodes};
use scour_core::options::{NodeId, OptionTree};

const FIREFOX: NodeId = NodeId::Category(0);
const CACHE: NodeId = NodeId::Item(0, 0);
const HISTORY: NodeId = NodeId::Item(0, 1);
const SYSTEM: NodeId = NodeId::Category(1);
const LOGS: NodeId = NodeId::Item(1, 0);

fn sample_tree() -> OptionTree {
    OptionTree::from_catalog(&Catalog::new(vec![
        CatalogEntry::new("Firefox", &["Cache", "History"]),
        CatalogEntry::new("System", &["Logs"]),
    ]))
    .expect("valid catalog")
}

fn visible_labels(tree: &OptionTree, term: &str) -> Vec<String> {
    visible_nodes(tree, term)
        .into_iter()
        .map(|id| tree.label(id).unwrap().to_string())
        .collect()
}

#[test]
fn empty_term_shows_every_node() {
    let tree = OptionTree::from_catalog(&Catalog::default()).unwrap();
    for id in tree.nodes() {
        assert!(is_visible(&tree, id, ""), "{id:?} should be visible");
    }
}

#[test]
fn matching_is_case_insensitive() {
    let tree = OptionTree::from_catalog(&Catalog::default()).unwrap();
    for term in ["cache", "fire", "temporary", "o"] {
        let upper = term.to_uppercase();
        for id in tree.nodes() {
            assert_eq!(
                is_visible(&tree, id, term),
                is_visible(&tree, id, &upper),
                "{id:?} with {term:?}"
            );
        }
    }
}

#[test]
fn matching_category_shows_all_its_items() {
    let tree = sample_tree();
    assert!(is_visible(&tree, FIREFOX, "fire"));
    assert!(is_visible(&tree, CACHE, "fire"));
    assert!(is_visible(&tree, HISTORY, "fire"));
    assert!(!is_visible(&tree, SYSTEM, "fire"));
    assert!(!is_visible(&tree, LOGS, "fire"));
    assert_eq!(visible_labels(&tree, "fire"), ["Firefox", "Cache", "History"]);
}

#[test]
fn matching_item_keeps_its_category() {
    let tree = sample_tree();
    assert!(is_visible(&tree, CACHE, "cache"));
    assert!(is_visible(&tree, FIREFOX, "cache"));
    assert!(!is_visible(&tree, HISTORY, "cache"));
    assert!(!is_visible(&tree, SYSTEM, "cache"));
    assert_eq!(visible_labels(&tree, "cache"), ["Firefox", "Cache"]);
}

#[test]
fn no_match_hides_everything() {
    let tree = sample_tree();
    assert!(visible_nodes(&tree, "zzz").is_empty());
}

#[test]
fn childless_category_depends_on_its_own_label() {
    let tree = OptionTree::from_catalog(&Catalog::new(vec![
        CatalogEntry::new("Firefox", &["Cache", "History"]),
        CatalogEntry::new("System", &[]),
    ]))
    .unwrap();
    assert!(is_visible(&tree, NodeId::Category(1), "sys"));
    assert!(!is_visible(&tree, NodeId::Category(1), "xyz"));
}

#[test]
fn repeated_queries_agree() {
    let tree = sample_tree();
    for id in tree.nodes() {
        for term in ["", "cache", "LOG", "zzz"] {
            assert_eq!(is_visible(&tree, id, term), is_visible(&tree, id, term));
        }
    }
}

#[test]
fn shared_item_labels_match_under_every_category() {
    let tree = OptionTree::from_catalog(&Catalog::default()).unwrap();
    let labels = visible_labels(&tree, "cache");
    assert_eq!(
        labels,
        ["Firefox", "Cache", "Chrome", "Cache", "Edge", "Cache", "System", "Cache"]
    );
}
