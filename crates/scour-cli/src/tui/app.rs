use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use scour_core::config::Config;
use scour_core::error::ScourError;
use scour_core::filter;
use scour_core::mock::{Generator, RunHandle, RunKind, WorkerEvent};
use scour_core::options::{NodeId, OptionTree};
use scour_core::results::{ResultColumn, ResultRow, SortKey};
use scour_core::whitelist::Whitelist;

use super::commands::{self, CONTEXT_MENU, Command, MENUS};
use super::fuzzy::RowMatcher;
use super::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    OptionsSearch,
    Options,
    ResultsSearch,
    Results,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::OptionsSearch => Focus::Options,
            Focus::Options => Focus::ResultsSearch,
            Focus::ResultsSearch => Focus::Results,
            Focus::Results => Focus::OptionsSearch,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::OptionsSearch => Focus::Results,
            Focus::Options => Focus::OptionsSearch,
            Focus::ResultsSearch => Focus::Options,
            Focus::Results => Focus::ResultsSearch,
        }
    }
}

pub enum Overlay {
    None,
    Menu { menu: usize, selected: usize },
    ContextMenu { selected: usize },
    Confirming { command: Command },
    Message { title: String, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub tree: OptionTree,
    /// Current options search term.
    pub search: String,
    pub visible: Vec<NodeId>,
    pub option_cursor: usize,
    /// Rows in arrival order; the table shows them through `view`.
    pub results: Vec<ResultRow>,
    pub results_query: String,
    /// Indices into `results` in display order.
    pub view: Vec<usize>,
    pub result_cursor: usize,
    /// Indices into `results`.
    pub selected_rows: BTreeSet<usize>,
    pub sort: Option<SortKey>,
    pub whitelist: Whitelist,
    pub run: Option<RunHandle>,
    pub focus: Focus,
    pub overlay: Overlay,
    pub message: Option<String>,
    home: PathBuf,
    matcher: RowMatcher,
}

impl App {
    pub fn new(config: Config, tree: OptionTree) -> Result<Self, ScourError> {
        let home = Config::home_dir()?;
        Ok(Self::with_home(config, tree, home))
    }

    pub fn with_home(config: Config, tree: OptionTree, home: PathBuf) -> Self {
        let visible = filter::visible_nodes(&tree, "");
        Self {
            config,
            tree,
            search: String::new(),
            visible,
            option_cursor: 0,
            results: Vec::new(),
            results_query: String::new(),
            view: Vec::new(),
            result_cursor: 0,
            selected_rows: BTreeSet::new(),
            sort: None,
            whitelist: Whitelist::new(),
            run: None,
            focus: Focus::OptionsSearch,
            overlay: Overlay::None,
            message: None,
            home,
            matcher: RowMatcher::new(),
        }
    }

    // --- Options pane ---

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.refilter_options();
    }

    fn refilter_options(&mut self) {
        self.visible = filter::visible_nodes(&self.tree, &self.search);
        if self.option_cursor >= self.visible.len() {
            self.option_cursor = self.visible.len().saturating_sub(1);
        }
    }

    pub fn current_option(&self) -> Option<NodeId> {
        self.visible.get(self.option_cursor).copied()
    }

    pub fn toggle_current_option(&mut self) {
        if let Some(id) = self.current_option()
            && let Some(enabled) = self.tree.toggle(id)
        {
            let label = self.tree.label(id).unwrap_or_default();
            tracing::debug!(option = label, enabled, "toggled option");
        }
    }

    // --- Runs ---

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn can_abort(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.is_aborting())
    }

    pub fn can_whitelist(&self) -> bool {
        !self.selected_rows.is_empty()
    }

    pub fn start_run(&mut self, kind: RunKind) {
        if let Some(previous) = self.run.take() {
            previous.abort();
        }
        self.results.clear();
        self.selected_rows.clear();
        self.result_cursor = 0;
        self.refresh_view();

        let generator = Generator::new(
            self.config.generator_settings(),
            &self.tree,
            &self.whitelist,
            &self.home,
        );
        match generator.spawn(kind) {
            Ok(handle) => {
                self.run = Some(handle);
                self.message = Some(match kind {
                    RunKind::Preview => "Previewing...".to_string(),
                    RunKind::Clean => "Cleaning...".to_string(),
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to start worker");
                self.message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn abort_run(&mut self) {
        if let Some(run) = &self.run {
            run.abort();
            self.message = Some("Aborting...".to_string());
        }
    }

    /// Move rows from the worker into the table. Returns true if anything arrived.
    pub fn poll_worker(&mut self) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let events = run.drain();
        if events.is_empty() {
            return false;
        }

        for event in events {
            match event {
                WorkerEvent::Row(row) => self.results.push(row),
                WorkerEvent::Finished(summary) => {
                    self.run = None;
                    let verb = match summary.kind {
                        RunKind::Preview => "Preview",
                        RunKind::Clean => "Clean",
                    };
                    let state = if summary.aborted {
                        "aborted"
                    } else {
                        "complete"
                    };
                    self.message = Some(format!(
                        "{verb} {state}: {} files, {}",
                        summary.rows,
                        bytesize::ByteSize(summary.bytes)
                    ));
                }
            }
        }
        self.refresh_view();
        true
    }

    // --- Results pane ---

    pub fn set_results_query(&mut self, query: impl Into<String>) {
        self.results_query = query.into();
        self.result_cursor = 0;
        self.refresh_view();
    }

    pub fn sort_by(&mut self, column: ResultColumn) {
        self.sort = Some(SortKey::clicked(self.sort, column));
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let haystacks: Vec<String> = self
            .results
            .iter()
            .map(|r| format!("{} {} {}", r.cleaner, r.option, r.filename.display()))
            .collect();
        let mut view = self
            .matcher
            .filter(&self.results_query, haystacks.iter().map(String::as_str));
        if let Some(key) = self.sort {
            view.sort_by(|&a, &b| key.compare(&self.results[a], &self.results[b]));
        }
        self.view = view;
        if self.result_cursor >= self.view.len() {
            self.result_cursor = self.view.len().saturating_sub(1);
        }
    }

    pub fn current_row(&self) -> Option<usize> {
        self.view.get(self.result_cursor).copied()
    }

    pub fn toggle_row_selection(&mut self) {
        if let Some(row) = self.current_row()
            && !self.selected_rows.remove(&row)
        {
            self.selected_rows.insert(row);
        }
    }

    pub fn select_all_rows(&mut self) {
        self.selected_rows.extend(self.view.iter().copied());
    }

    /// Paths of the selected rows, or of the row under the cursor when none are selected.
    pub fn target_paths(&self) -> Vec<PathBuf> {
        let rows: Vec<usize> = if self.selected_rows.is_empty() {
            self.current_row().into_iter().collect()
        } else {
            self.selected_rows.iter().copied().collect()
        };
        rows.into_iter()
            .filter_map(|i| self.results.get(i))
            .map(|r| r.filename.clone())
            .collect()
    }

    fn whitelist_selected(&mut self) {
        let paths = self.target_paths();
        if paths.is_empty() {
            self.message = Some("Nothing selected".to_string());
            return;
        }
        let total = paths.len();
        let added = self.whitelist.extend(paths);
        self.selected_rows.clear();
        self.message = Some(format!(
            "Whitelisted {added} new of {total} file(s); {} in whitelist",
            self.whitelist.len()
        ));
    }

    fn copy_paths(&mut self) {
        let paths = self.target_paths();
        if paths.is_empty() {
            self.message = Some("Nothing selected".to_string());
            return;
        }
        let text = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let result = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text));
        self.message = Some(match result {
            Ok(()) => format!("Copied {} path(s)", paths.len()),
            Err(e) => format!("Failed to copy: {e}"),
        });
    }

    fn open_location(&mut self) {
        let Some(path) = self.target_paths().into_iter().next() else {
            self.message = Some("Nothing selected".to_string());
            return;
        };
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();
        let result = {
            #[cfg(target_os = "macos")]
            {
                process::Command::new("open").arg(&dir).spawn()
            }
            #[cfg(target_os = "windows")]
            {
                process::Command::new("explorer").arg(&dir).spawn()
            }
            #[cfg(not(any(target_os = "macos", target_os = "windows")))]
            {
                process::Command::new("xdg-open").arg(&dir).spawn()
            }
        };
        self.message = Some(match result {
            Ok(_) => format!("Opened {}", dir.display()),
            Err(e) => format!("Failed to open file manager: {e}"),
        });
    }

    // --- Commands ---

    pub fn dispatch(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "dispatch");
        self.overlay = Overlay::None;
        match command {
            Command::Quit => return Flow::Quit,
            Command::Preview => self.start_run(RunKind::Preview),
            Command::Clean => {
                self.overlay = Overlay::Confirming {
                    command: Command::Clean,
                }
            }
            Command::Abort => self.abort_run(),
            Command::Whitelist => self.whitelist_selected(),
            Command::CopyPath => self.copy_paths(),
            Command::OpenFileLocation => self.open_location(),
            Command::About => {
                self.overlay = Overlay::Message {
                    title: "About".to_string(),
                    body: format!(
                        "scour {}\nPrototype front-end for a disk cleaner.\nResults are simulated.",
                        env!("CARGO_PKG_VERSION")
                    ),
                }
            }
            Command::SystemInformation => {
                self.overlay = Overlay::Message {
                    title: "System information".to_string(),
                    body: self.system_information(),
                }
            }
            Command::Help => {
                self.overlay = Overlay::Message {
                    title: "Help".to_string(),
                    body: HELP.to_string(),
                }
            }
            Command::ShredFile
            | Command::ShredFolder
            | Command::WipeFreeSpace
            | Command::MakeChaff
            | Command::Preferences => {
                tracing::info!(command = command.label(), "command not available");
                self.message = Some(format!(
                    "{}: not available in this prototype",
                    command.label()
                ));
            }
        }
        Flow::Continue
    }

    /// Run a command after the user confirmed it.
    fn confirmed(&mut self, command: Command) {
        self.overlay = Overlay::None;
        if command == Command::Clean {
            self.start_run(RunKind::Clean);
        }
    }

    fn system_information(&self) -> String {
        let config = Config::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let log = self
            .config
            .log_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Version: {}\nOS: {} ({})\nHome: {}\nConfig: {config}\nLog: {log}\nOptions: {} ({} enabled)\nWhitelist: {} file(s)",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
            self.home.display(),
            self.tree.len(),
            self.tree.enabled_items().len(),
            self.whitelist.len(),
        )
    }

    // --- Keys ---

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        match &self.overlay {
            Overlay::None => {}
            Overlay::Menu { menu, selected } => {
                let (menu, selected) = (*menu, *selected);
                return self.handle_menu_key(key.code, menu, selected);
            }
            Overlay::ContextMenu { selected } => {
                let selected = *selected;
                return self.handle_context_key(key.code, selected);
            }
            Overlay::Confirming { command } => {
                let command = *command;
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => self.confirmed(command),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.overlay = Overlay::None;
                    }
                    _ => {}
                }
                return Flow::Continue;
            }
            Overlay::Message { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
                return Flow::Continue;
            }
        }

        // Global bindings
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            return Flow::Quit;
        }
        if key.modifiers.contains(KeyModifiers::ALT)
            && let KeyCode::Char(c) = key.code
            && let Some(menu) = commands::menu_for_hotkey(c)
        {
            self.overlay = Overlay::Menu { menu, selected: 0 };
            return Flow::Continue;
        }
        if key.code == KeyCode::F(10) {
            self.overlay = Overlay::Menu {
                menu: 0,
                selected: 0,
            };
            return Flow::Continue;
        }
        if key.code == KeyCode::F(1) {
            return self.dispatch(Command::Help);
        }
        if let Some(command) = commands::toolbar_command(key.code) {
            return self.dispatch_toolbar(command);
        }
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Flow::Continue;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Flow::Continue;
            }
            _ => {}
        }

        match self.focus {
            Focus::OptionsSearch => self.handle_options_search_key(key),
            Focus::Options => return self.handle_options_key(key.code),
            Focus::ResultsSearch => self.handle_results_search_key(key),
            Focus::Results => return self.handle_results_key(key.code),
        }
        Flow::Continue
    }

    /// Toolbar buttons that are not sensitive do nothing.
    fn dispatch_toolbar(&mut self, command: Command) -> Flow {
        let sensitive = match command {
            Command::Abort => self.can_abort(),
            Command::Whitelist => self.can_whitelist(),
            _ => true,
        };
        if sensitive {
            self.dispatch(command)
        } else {
            Flow::Continue
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode, menu: usize, selected: usize) -> Flow {
        let items = MENUS[menu].items;
        match code {
            KeyCode::Esc | KeyCode::F(10) => self.overlay = Overlay::None,
            KeyCode::Left => {
                let menu = (menu + MENUS.len() - 1) % MENUS.len();
                self.overlay = Overlay::Menu { menu, selected: 0 };
            }
            KeyCode::Right => {
                let menu = (menu + 1) % MENUS.len();
                self.overlay = Overlay::Menu { menu, selected: 0 };
            }
            KeyCode::Up | KeyCode::Char('k') if selected > 0 => {
                self.overlay = Overlay::Menu {
                    menu,
                    selected: selected - 1,
                };
            }
            KeyCode::Down | KeyCode::Char('j') if selected + 1 < items.len() => {
                self.overlay = Overlay::Menu {
                    menu,
                    selected: selected + 1,
                };
            }
            KeyCode::Enter => {
                if let Some(item) = items.get(selected) {
                    return self.dispatch(item.command);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_context_key(&mut self, code: KeyCode, selected: usize) -> Flow {
        match code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Up | KeyCode::Char('k') if selected > 0 => {
                self.overlay = Overlay::ContextMenu {
                    selected: selected - 1,
                };
            }
            KeyCode::Down | KeyCode::Char('j') if selected + 1 < CONTEXT_MENU.len() => {
                self.overlay = Overlay::ContextMenu {
                    selected: selected + 1,
                };
            }
            KeyCode::Enter => {
                if let Some(item) = CONTEXT_MENU.get(selected) {
                    return self.dispatch(item.command);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_options_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if is_text_input(key) => {
                self.search.push(c);
                self.refilter_options();
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.refilter_options();
            }
            KeyCode::Esc => self.set_search(""),
            KeyCode::Down | KeyCode::Enter => self.focus = Focus::Options,
            _ => {}
        }
    }

    fn handle_options_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('/') | KeyCode::Esc => self.focus = Focus::OptionsSearch,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.option_cursor > 0 {
                    self.option_cursor -= 1;
                } else {
                    self.focus = Focus::OptionsSearch;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.option_cursor + 1 < self.visible.len() {
                    self.option_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current_option(),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_results_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if is_text_input(key) => {
                let mut query = std::mem::take(&mut self.results_query);
                query.push(c);
                self.set_results_query(query);
            }
            KeyCode::Backspace => {
                let mut query = std::mem::take(&mut self.results_query);
                query.pop();
                self.set_results_query(query);
            }
            KeyCode::Esc => self.set_results_query(""),
            KeyCode::Down | KeyCode::Enter => self.focus = Focus::Results,
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('/') | KeyCode::Esc => self.focus = Focus::ResultsSearch,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.result_cursor > 0 {
                    self.result_cursor -= 1;
                } else {
                    self.focus = Focus::ResultsSearch;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.result_cursor + 1 < self.view.len() {
                    self.result_cursor += 1;
                }
            }
            KeyCode::Home => self.result_cursor = 0,
            KeyCode::End => self.result_cursor = self.view.len().saturating_sub(1),
            KeyCode::Char(' ') => {
                self.toggle_row_selection();
                if self.result_cursor + 1 < self.view.len() {
                    self.result_cursor += 1;
                }
            }
            KeyCode::Char('a') => self.select_all_rows(),
            KeyCode::Char('c') => return self.dispatch(Command::CopyPath),
            KeyCode::Enter | KeyCode::Char('m') => {
                if self.current_row().is_some() {
                    self.overlay = Overlay::ContextMenu { selected: 0 };
                }
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.sort_by(ResultColumn::ALL[index]);
            }
            _ => {}
        }
        Flow::Continue
    }
}

/// Plain or shifted characters; Ctrl and Alt chords are not typed into fields.
fn is_text_input(key: KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

const HELP: &str = "\
Tab/Shift-Tab  move between panes
F10, Alt-f/e/h  open menus
F5 Preview  F6 Clean  F7 Abort  F8 Whitelist
Options: type to search, Space toggles
Results: Space selects, a selects all, 1-5 sort,
         Enter opens the context menu, c copies path
Esc returns to the search field, q or Ctrl-q quits";

/// Run the TUI on stderr until the user quits.
pub fn run(config: Config, tree: OptionTree) -> color_eyre::Result<()> {
    let mut app = App::new(config, tree)?;

    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, cursor::Hide)?;
    terminal::enable_raw_mode()?;

    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    if let Some(run) = app.run.take() {
        run.abort();
    }
    terminal::disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, cursor::Show)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
) -> color_eyre::Result<()> {
    loop {
        if app.is_running() {
            app.poll_worker();
        }
        terminal.draw(|f| view::render(f, app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key) == Flow::Quit
        {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scour_core::catalog::{Catalog, CatalogEntry};

    fn app() -> App {
        let config = Config {
            delay_scale: 0.0,
            seed: Some(17),
            ..Config::default()
        };
        let tree = OptionTree::from_catalog(&Catalog::new(vec![
            CatalogEntry::new("Firefox", &["Cache", "History"]),
            CatalogEntry::new("System", &["Logs"]),
        ]))
        .unwrap();
        App::with_home(config, tree, PathBuf::from("/home/tester"))
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn finish_run(app: &mut App) {
        while app.is_running() {
            app.poll_worker();
            std::thread::yield_now();
        }
    }

    #[test]
    fn typing_refilters_options() {
        let mut app = app();
        assert_eq!(app.visible.len(), 5);
        type_str(&mut app, "CACHE");
        assert_eq!(
            app.visible,
            vec![NodeId::Category(0), NodeId::Item(0, 0)]
        );
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "zzz");
        assert!(app.visible.is_empty());
        assert_eq!(app.current_option(), None);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.visible.len(), 5);
    }

    #[test]
    fn modifier_chords_are_not_typed() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(app.search, "");
        assert_eq!(app.visible.len(), 5);
        app.handle_key(KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT));
        assert_eq!(app.search, "L");

        app.focus = Focus::ResultsSearch;
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(app.results_query, "");
    }

    #[test]
    fn esc_in_a_pane_returns_to_its_search_field() {
        let mut app = app();
        app.focus = Focus::Options;
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Continue);
        assert_eq!(app.focus, Focus::OptionsSearch);

        app.focus = Focus::Results;
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Continue);
        assert_eq!(app.focus, Focus::ResultsSearch);

        app.focus = Focus::Results;
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }

    #[test]
    fn space_toggles_option_under_cursor() {
        let mut app = app();
        app.set_search("logs");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focus, Focus::Options);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.current_option(), Some(NodeId::Item(1, 0)));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.tree.enabled(NodeId::Item(1, 0)), Some(false));
        assert_eq!(app.tree.enabled(NodeId::Category(1)), Some(false));
    }

    #[test]
    fn preview_fills_results_and_finishes() {
        let mut app = app();
        assert!(!app.can_abort());
        assert_eq!(press(&mut app, KeyCode::F(5)), Flow::Continue);
        finish_run(&mut app);
        assert!((5..=50).contains(&app.results.len()));
        assert_eq!(app.view.len(), app.results.len());
        assert!(app.message.as_deref().unwrap().starts_with("Preview complete"));
        assert!(!app.can_abort());
    }

    #[test]
    fn clean_asks_for_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::F(6));
        assert!(matches!(app.overlay, Overlay::Confirming { .. }));
        assert!(!app.is_running());
        press(&mut app, KeyCode::Char('n'));
        assert!(matches!(app.overlay, Overlay::None));

        press(&mut app, KeyCode::F(6));
        press(&mut app, KeyCode::Char('y'));
        finish_run(&mut app);
        assert!(!app.results.is_empty());
        assert!(app.message.as_deref().unwrap().starts_with("Clean complete"));
    }

    #[test]
    fn whitelist_needs_a_selection() {
        let mut app = app();
        app.dispatch(Command::Preview);
        finish_run(&mut app);
        assert!(!app.can_whitelist());
        press(&mut app, KeyCode::F(8));
        assert!(app.whitelist.is_empty());

        app.focus = Focus::Results;
        press(&mut app, KeyCode::Char(' '));
        assert!(app.can_whitelist());
        press(&mut app, KeyCode::F(8));
        assert_eq!(app.whitelist.len(), 1);
        assert!(!app.can_whitelist());
    }

    #[test]
    fn whitelisted_files_disappear_from_next_run() {
        let mut app = app();
        app.dispatch(Command::Preview);
        finish_run(&mut app);
        let before = app.results.len();
        app.select_all_rows();
        app.dispatch(Command::Whitelist);

        app.dispatch(Command::Preview);
        finish_run(&mut app);
        assert!(app.results.is_empty(), "had {before} rows before");
    }

    #[test]
    fn sort_keys_flip_direction() {
        let mut app = app();
        app.dispatch(Command::Preview);
        finish_run(&mut app);
        app.focus = Focus::Results;

        press(&mut app, KeyCode::Char('4'));
        let sizes: Vec<u64> = app.view.iter().map(|&i| app.results[i].size).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));

        press(&mut app, KeyCode::Char('4'));
        let sizes: Vec<u64> = app.view.iter().map(|&i| app.results[i].size).collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn results_search_narrows_view() {
        let mut app = app();
        app.dispatch(Command::Preview);
        finish_run(&mut app);
        app.focus = Focus::ResultsSearch;
        type_str(&mut app, "history");
        assert!(
            app.view
                .iter()
                .all(|&i| app.results[i].option == "History")
        );
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view.len(), app.results.len());
    }

    #[test]
    fn unavailable_commands_report_in_status() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT));
        assert!(matches!(app.overlay, Overlay::Menu { menu: 0, selected: 0 }));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.message.as_deref(),
            Some("Shred file: not available in this prototype")
        );
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn quit_from_menu() {
        let mut app = app();
        press(&mut app, KeyCode::F(10));
        for _ in 0..4 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(press(&mut app, KeyCode::Enter), Flow::Quit);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert!(matches!(app.overlay, Overlay::Message { .. }));
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn abort_stops_a_running_clean() {
        let mut app = app();
        app.config.delay_scale = 1.0;
        app.config.min_files = 50;
        app.start_run(RunKind::Clean);
        assert!(app.can_abort());
        press(&mut app, KeyCode::F(7));
        assert!(!app.can_abort());
        finish_run(&mut app);
        assert!(app.results.len() < 50);
        assert!(app.message.as_deref().unwrap().contains("aborted"));
    }
}
