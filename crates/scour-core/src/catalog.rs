use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ScourError;

const BROWSER_OPTIONS: [&str; 5] = ["Cache", "History", "Cookies", "Sessions", "Passwords"];

const SYSTEM_OPTIONS: [&str; 6] = [
    "Cache",
    "Clipboard",
    "Custom",
    "Logs",
    "Temporary files",
    "Trash",
];

/// One cleaner and the options it offers, as written in `[[catalog]]` config entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, options: &[&str]) -> Self {
        Self {
            name: name.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Static description of the cleaners the options tree is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    /// Example cleaners used when the config does not define a catalog.
    fn default() -> Self {
        Self {
            entries: vec![
                CatalogEntry::new("Firefox", &BROWSER_OPTIONS),
                CatalogEntry::new("Chrome", &BROWSER_OPTIONS),
                CatalogEntry::new("Edge", &BROWSER_OPTIONS),
                CatalogEntry::new("System", &SYSTEM_OPTIONS),
            ],
        }
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Check that the catalog is non-empty and labels are unique among siblings.
    pub fn validate(&self) -> Result<(), ScourError> {
        if self.entries.is_empty() {
            return Err(ScourError::EmptyCatalog);
        }

        let mut names = HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(ScourError::EmptyLabel("<root>".to_string()));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ScourError::DuplicateLabel {
                    scope: "catalog".to_string(),
                    label: entry.name.clone(),
                });
            }

            let mut options = HashSet::new();
            for option in &entry.options {
                if option.trim().is_empty() {
                    return Err(ScourError::EmptyLabel(entry.name.clone()));
                }
                if !options.insert(option.as_str()) {
                    return Err(ScourError::DuplicateLabel {
                        scope: entry.name.clone(),
                        label: option.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::default();
        catalog.validate().unwrap();
        let names: Vec<&str> = catalog.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Firefox", "Chrome", "Edge", "System"]);
        assert_eq!(catalog.entries[3].options.len(), 6);
    }

    #[test]
    fn same_label_under_different_categories_is_allowed() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Firefox", &["Cache"]),
            CatalogEntry::new("System", &["Cache"]),
        ]);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_siblings() {
        let catalog = Catalog::new(vec![CatalogEntry::new("Firefox", &["Cache", "Cache"])]);
        assert!(matches!(
            catalog.validate(),
            Err(ScourError::DuplicateLabel { label, .. }) if label == "Cache"
        ));

        let catalog = Catalog::new(vec![
            CatalogEntry::new("Edge", &[]),
            CatalogEntry::new("Edge", &[]),
        ]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn rejects_empty_catalog_and_labels() {
        assert!(matches!(
            Catalog::new(Vec::new()).validate(),
            Err(ScourError::EmptyCatalog)
        ));
        let catalog = Catalog::new(vec![CatalogEntry::new("System", &[" "])]);
        assert!(matches!(catalog.validate(), Err(ScourError::EmptyLabel(_))));
    }
}
