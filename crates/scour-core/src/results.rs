use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What happened (or would happen) to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultAction {
    /// Preview row: nothing was done yet.
    None,
    Shred,
    Deleted,
    Error,
}

impl fmt::Display for ResultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultAction::None => write!(f, ""),
            ResultAction::Shred => write!(f, "shred"),
            ResultAction::Deleted => write!(f, "deleted"),
            ResultAction::Error => write!(f, "error"),
        }
    }
}

/// A file found by a preview or clean run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub cleaner: String,
    pub option: String,
    pub filename: PathBuf,
    pub size: u64,
    pub action: ResultAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultColumn {
    Cleaner,
    Option,
    Filename,
    Size,
    Action,
}

impl ResultColumn {
    pub const ALL: [ResultColumn; 5] = [
        ResultColumn::Cleaner,
        ResultColumn::Option,
        ResultColumn::Filename,
        ResultColumn::Size,
        ResultColumn::Action,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ResultColumn::Cleaner => "Cleaner",
            ResultColumn::Option => "Option",
            ResultColumn::Filename => "Filename",
            ResultColumn::Size => "File size (B)",
            ResultColumn::Action => "Action",
        }
    }

    fn compare(self, a: &ResultRow, b: &ResultRow) -> Ordering {
        match self {
            ResultColumn::Cleaner => a.cleaner.cmp(&b.cleaner),
            ResultColumn::Option => a.option.cmp(&b.option),
            ResultColumn::Filename => a.filename.cmp(&b.filename),
            ResultColumn::Size => a.size.cmp(&b.size),
            ResultColumn::Action => a.action.to_string().cmp(&b.action.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: ResultColumn,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: ResultColumn) -> Self {
        Self {
            column,
            order: SortOrder::Ascending,
        }
    }

    /// Sort key after clicking `column`: same column flips direction, a new
    /// column starts ascending.
    pub fn clicked(current: Option<SortKey>, column: ResultColumn) -> SortKey {
        match current {
            Some(key) if key.column == column => SortKey {
                column,
                order: match key.order {
                    SortOrder::Ascending => SortOrder::Descending,
                    SortOrder::Descending => SortOrder::Ascending,
                },
            },
            _ => SortKey::ascending(column),
        }
    }

    pub fn compare(&self, a: &ResultRow, b: &ResultRow) -> Ordering {
        let ord = self.column.compare(a, b);
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

/// Stable sort of rows by `key`.
pub fn sort_rows(rows: &mut [ResultRow], key: SortKey) {
    rows.sort_by(|a, b| key.compare(a, b));
}

/// Total bytes across rows.
pub fn total_size(rows: &[ResultRow]) -> u64 {
    rows.iter().map(|r| r.size).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cleaner: &str, size: u64, action: ResultAction) -> ResultRow {
        ResultRow {
            cleaner: cleaner.to_string(),
            option: "Cache".to_string(),
            filename: PathBuf::from(format!("/home/u/.cache/{cleaner}/{size}")),
            size,
            action,
        }
    }

    #[test]
    fn size_sorts_numerically() {
        let mut rows = vec![
            row("Edge", 900, ResultAction::Shred),
            row("Chrome", 10000, ResultAction::Shred),
            row("Firefox", 20, ResultAction::Shred),
        ];
        sort_rows(&mut rows, SortKey::ascending(ResultColumn::Size));
        let sizes: Vec<u64> = rows.iter().map(|r| r.size).collect();
        assert_eq!(sizes, [20, 900, 10000]);

        sort_rows(
            &mut rows,
            SortKey {
                column: ResultColumn::Size,
                order: SortOrder::Descending,
            },
        );
        assert_eq!(rows[0].size, 10000);
    }

    #[test]
    fn action_sorts_by_text() {
        let mut rows = vec![
            row("A", 1, ResultAction::Shred),
            row("B", 2, ResultAction::Deleted),
            row("C", 3, ResultAction::Error),
        ];
        sort_rows(&mut rows, SortKey::ascending(ResultColumn::Action));
        let actions: Vec<String> = rows.iter().map(|r| r.action.to_string()).collect();
        assert_eq!(actions, ["deleted", "error", "shred"]);
    }

    #[test]
    fn clicking_same_column_flips_order() {
        let key = SortKey::clicked(None, ResultColumn::Cleaner);
        assert_eq!(key.order, SortOrder::Ascending);
        let key = SortKey::clicked(Some(key), ResultColumn::Cleaner);
        assert_eq!(key.order, SortOrder::Descending);
        let key = SortKey::clicked(Some(key), ResultColumn::Option);
        assert_eq!(key, SortKey::ascending(ResultColumn::Option));
    }

    #[test]
    fn total() {
        let rows = vec![row("A", 1000, ResultAction::None), row("B", 24, ResultAction::None)];
        assert_eq!(total_size(&rows), 1024);
        assert_eq!(ResultAction::None.to_string(), "");
    }
}
