//! The two-level tree of cleaning options shown in the options pane.
//!
//! Categories (cleaners such as "Firefox") own their items ("Cache",
//! "History", ...). Nodes are addressed by [`NodeId`], which carries the
//! category index for items so the parent of any node is known without a
//! back pointer.

use crate::catalog::Catalog;
use crate::error::ScourError;

/// Handle to a node in an [`OptionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// A root node, by category index.
    Category(usize),
    /// A leaf node, by category index and item index within that category.
    Item(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub enabled: bool,
    pub items: Vec<OptionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTree {
    categories: Vec<Category>,
}

impl OptionTree {
    /// Build the tree from a catalog. Every node starts enabled.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, ScourError> {
        catalog.validate()?;
        let categories = catalog
            .entries
            .iter()
            .map(|entry| Category {
                label: entry.name.clone(),
                enabled: true,
                items: entry
                    .options
                    .iter()
                    .map(|label| OptionItem {
                        label: label.clone(),
                        enabled: true,
                    })
                    .collect(),
            })
            .collect();
        Ok(Self { categories })
    }

    /// Root nodes in display order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.categories.len()).map(NodeId::Category)
    }

    /// Children of a node in display order. Items have none.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match id {
            NodeId::Category(c) => self
                .categories
                .get(c)
                .map(|cat| (0..cat.items.len()).map(|i| NodeId::Item(c, i)).collect())
                .unwrap_or_default(),
            NodeId::Item(..) => Vec::new(),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match id {
            NodeId::Category(_) => None,
            NodeId::Item(c, _) => Some(NodeId::Category(c)),
        }
    }

    /// Every node in pre-order: each category followed by its items.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for root in self.roots() {
            nodes.push(root);
            nodes.extend(self.children(root));
        }
        nodes
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        match id {
            NodeId::Category(c) => self.categories.get(c).map(|cat| cat.label.as_str()),
            NodeId::Item(c, i) => self
                .categories
                .get(c)
                .and_then(|cat| cat.items.get(i))
                .map(|item| item.label.as_str()),
        }
    }

    pub fn enabled(&self, id: NodeId) -> Option<bool> {
        match id {
            NodeId::Category(c) => self.categories.get(c).map(|cat| cat.enabled),
            NodeId::Item(c, i) => self
                .categories
                .get(c)
                .and_then(|cat| cat.items.get(i))
                .map(|item| item.enabled),
        }
    }

    /// Flip the enabled flag of a node.
    ///
    /// Toggling a category applies the new value to all of its items. Toggling
    /// an item leaves its category enabled while any sibling is enabled.
    /// Returns the new value, or `None` for an unknown node.
    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        match id {
            NodeId::Category(c) => {
                let cat = self.categories.get_mut(c)?;
                cat.enabled = !cat.enabled;
                for item in &mut cat.items {
                    item.enabled = cat.enabled;
                }
                Some(cat.enabled)
            }
            NodeId::Item(c, i) => {
                let cat = self.categories.get_mut(c)?;
                let item = cat.items.get_mut(i)?;
                item.enabled = !item.enabled;
                let value = item.enabled;
                cat.enabled = cat.items.iter().any(|item| item.enabled);
                Some(value)
            }
        }
    }

    /// Enabled `(category, item)` label pairs, in display order.
    pub fn enabled_items(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|cat| {
                cat.items
                    .iter()
                    .filter(|item| item.enabled)
                    .map(move |item| (cat.label.as_str(), item.label.as_str()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|cat| 1 + cat.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
