use crossterm::event::KeyCode;

/// Everything a menu entry, toolbar button or context-menu entry can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShredFile,
    ShredFolder,
    WipeFreeSpace,
    MakeChaff,
    Quit,
    Preferences,
    SystemInformation,
    Help,
    About,
    Preview,
    Clean,
    Abort,
    Whitelist,
    CopyPath,
    OpenFileLocation,
}

pub struct MenuItem {
    pub command: Command,
    pub label: &'static str,
    pub description: &'static str,
}

pub struct Menu {
    pub title: &'static str,
    pub hotkey: char,
    pub items: &'static [MenuItem],
}

pub struct ToolButton {
    pub command: Command,
    pub label: &'static str,
    pub key: KeyCode,
    pub key_label: &'static str,
}

pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        hotkey: 'f',
        items: &[
            MenuItem {
                command: Command::ShredFile,
                label: "Shred file",
                description: "Overwrite and delete a single file",
            },
            MenuItem {
                command: Command::ShredFolder,
                label: "Shred folder",
                description: "Overwrite and delete a folder",
            },
            MenuItem {
                command: Command::WipeFreeSpace,
                label: "Wipe free space",
                description: "Overwrite unallocated disk space",
            },
            MenuItem {
                command: Command::MakeChaff,
                label: "Make chaff",
                description: "Generate decoy files",
            },
            MenuItem {
                command: Command::Quit,
                label: "Quit",
                description: "Exit the program",
            },
        ],
    },
    Menu {
        title: "Edit",
        hotkey: 'e',
        items: &[MenuItem {
            command: Command::Preferences,
            label: "Preferences",
            description: "Change program settings",
        }],
    },
    Menu {
        title: "Help",
        hotkey: 'h',
        items: &[
            MenuItem {
                command: Command::SystemInformation,
                label: "System information",
                description: "Show details about this system",
            },
            MenuItem {
                command: Command::Help,
                label: "Help",
                description: "Show key bindings",
            },
            MenuItem {
                command: Command::About,
                label: "About",
                description: "Show program version",
            },
        ],
    },
];

pub const TOOLBAR: &[ToolButton] = &[
    ToolButton {
        command: Command::Preview,
        label: "Preview",
        key: KeyCode::F(5),
        key_label: "F5",
    },
    ToolButton {
        command: Command::Clean,
        label: "Clean",
        key: KeyCode::F(6),
        key_label: "F6",
    },
    ToolButton {
        command: Command::Abort,
        label: "Abort",
        key: KeyCode::F(7),
        key_label: "F7",
    },
    ToolButton {
        command: Command::Whitelist,
        label: "Whitelist",
        key: KeyCode::F(8),
        key_label: "F8",
    },
];

/// Entries of the context menu on selected result rows.
pub const CONTEXT_MENU: &[MenuItem] = &[
    MenuItem {
        command: Command::CopyPath,
        label: "Copy path",
        description: "Copy the file path to the clipboard",
    },
    MenuItem {
        command: Command::OpenFileLocation,
        label: "Open file location",
        description: "Open the containing folder in the file manager",
    },
    MenuItem {
        command: Command::Whitelist,
        label: "Whitelist",
        description: "Keep these files in future runs",
    },
];

/// The toolbar command bound to a function key, if any.
pub fn toolbar_command(key: KeyCode) -> Option<Command> {
    TOOLBAR.iter().find(|b| b.key == key).map(|b| b.command)
}

/// Index of the menu opened by an Alt+letter shortcut.
pub fn menu_for_hotkey(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    MENUS.iter().position(|m| m.hotkey == c)
}

impl Command {
    pub fn label(self) -> &'static str {
        MENUS
            .iter()
            .flat_map(|m| m.items.iter())
            .chain(CONTEXT_MENU.iter())
            .find(|item| item.command == self)
            .map(|item| item.label)
            .or_else(|| {
                TOOLBAR
                    .iter()
                    .find(|b| b.command == self)
                    .map(|b| b.label)
            })
            .unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_layout() {
        let titles: Vec<&str> = MENUS.iter().map(|m| m.title).collect();
        assert_eq!(titles, ["File", "Edit", "Help"]);
        let file: Vec<&str> = MENUS[0].items.iter().map(|i| i.label).collect();
        assert_eq!(
            file,
            ["Shred file", "Shred folder", "Wipe free space", "Make chaff", "Quit"]
        );
    }

    #[test]
    fn function_keys_map_to_toolbar() {
        assert_eq!(toolbar_command(KeyCode::F(5)), Some(Command::Preview));
        assert_eq!(toolbar_command(KeyCode::F(8)), Some(Command::Whitelist));
        assert_eq!(toolbar_command(KeyCode::F(9)), None);
    }

    #[test]
    fn hotkeys_and_labels() {
        assert_eq!(menu_for_hotkey('H'), Some(2));
        assert_eq!(menu_for_hotkey('x'), None);
        assert_eq!(Command::Abort.label(), "Abort");
        assert_eq!(Command::OpenFileLocation.label(), "Open file location");
        assert_eq!(Command::WipeFreeSpace.label(), "Wipe free space");
    }
}
