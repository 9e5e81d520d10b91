use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Paths the user asked to keep for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    paths: BTreeSet<PathBuf>,
}

impl Whitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths, returning how many were not already present.
    pub fn extend<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.into();
            if self.paths.contains(&path) {
                continue;
            }
            tracing::info!(path = %path.display(), "whitelisted");
            self.paths.insert(path);
            added += 1;
        }
        added
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
