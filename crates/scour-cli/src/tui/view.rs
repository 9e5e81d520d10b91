use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap,
};

use scour_core::options::NodeId;
use scour_core::results::{ResultAction, ResultColumn, SortOrder};

use super::app::{App, Focus, Overlay};
use super::commands::{CONTEXT_MENU, Command, MENUS, MenuItem, TOOLBAR};

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // menu bar
            Constraint::Length(1), // toolbar
            Constraint::Min(5),    // panes
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_menu_bar(f, app, chunks[0]);
    render_toolbar(f, app, chunks[1]);

    let width = app.config.options_width;
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(width),
            Constraint::Percentage(100u16.saturating_sub(width)),
        ])
        .split(chunks[2]);

    render_options_pane(f, app, panes[0]);
    render_results_pane(f, app, panes[1]);
    render_status(f, app, chunks[3]);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Menu { menu, selected } => render_menu_dropdown(f, *menu, *selected, chunks[0]),
        Overlay::ContextMenu { selected } => {
            let count = app.target_paths().len();
            render_popup_menu(f, &format!(" {count} file(s) "), CONTEXT_MENU, *selected);
        }
        Overlay::Confirming { command } => render_confirm_dialog(f, command.label()),
        Overlay::Message { title, body } => render_message_popup(f, title, body),
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn menu_title_x(menu: usize) -> u16 {
    MENUS[..menu]
        .iter()
        .map(|m| m.title.len() as u16 + 2)
        .sum::<u16>()
}

fn render_menu_bar(f: &mut Frame, app: &App, area: Rect) {
    let open = match app.overlay {
        Overlay::Menu { menu, .. } => Some(menu),
        _ => None,
    };
    let spans: Vec<Span> = MENUS
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let style = if open == Some(i) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Span::styled(format!(" {} ", m.title), style)
        })
        .collect();
    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn render_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for button in TOOLBAR {
        let sensitive = match button.command {
            Command::Abort => app.can_abort(),
            Command::Whitelist => app.can_whitelist(),
            _ => true,
        };
        let style = if sensitive {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("[{} {}]", button.key_label, button.label),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_box(f: &mut Frame, area: Rect, query: &str, focused: bool) {
    let text = if query.is_empty() && !focused {
        Span::styled("Search", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(query)
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        text,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused)),
    );
    f.render_widget(input, area);

    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 3 + query.chars().count() as u16).min(max_x);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_options_pane(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_search_box(f, chunks[0], &app.search, app.focus == Focus::OptionsSearch);

    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|&id| {
            let label = app.tree.label(id).unwrap_or_default();
            let (text, style) = match id {
                NodeId::Category(_) => (
                    label.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                NodeId::Item(..) => (format!("  {label}"), Style::default()),
            };
            let check = if app.tree.enabled(id).unwrap_or(false) {
                "[x]"
            } else {
                "[ ]"
            };
            Row::new(vec![Cell::from(text), Cell::from(check)]).style(style)
        })
        .collect();

    let focused = app.focus == Focus::Options;
    let table = Table::new(rows, [Constraint::Min(8), Constraint::Length(8)])
        .header(
            Row::new(vec!["Option", "Selected"]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(focused))
                .title(format!(" Options {}/{} ", app.visible.len(), app.tree.len())),
        )
        .row_highlight_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        });

    let mut state = TableState::default().with_selected(if app.visible.is_empty() {
        None
    } else {
        Some(app.option_cursor)
    });
    f.render_stateful_widget(table, chunks[1], &mut state);
}

fn action_style(action: ResultAction) -> Style {
    match action {
        ResultAction::None => Style::default(),
        ResultAction::Shred => Style::default().fg(Color::Green),
        ResultAction::Deleted => Style::default().fg(Color::Yellow),
        ResultAction::Error => Style::default().fg(Color::Red),
    }
}

fn render_results_pane(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_search_box(
        f,
        chunks[0],
        &app.results_query,
        app.focus == Focus::ResultsSearch,
    );

    let rows: Vec<Row> = app
        .view
        .iter()
        .filter_map(|&i| app.results.get(i).map(|row| (i, row)))
        .map(|(i, row)| {
            let marker = if app.selected_rows.contains(&i) { "*" } else { " " };
            let style = if app.selected_rows.contains(&i) {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(row.cleaner.clone()),
                Cell::from(row.option.clone()),
                Cell::from(row.filename.display().to_string()),
                Cell::from(row.size.to_string()),
                Cell::from(Span::styled(row.action.to_string(), action_style(row.action))),
            ])
            .style(style)
        })
        .collect();

    let header: Vec<Cell> = std::iter::once(Cell::from(" "))
        .chain(ResultColumn::ALL.iter().enumerate().map(|(n, &column)| {
            let arrow = match app.sort {
                Some(key) if key.column == column => match key.order {
                    SortOrder::Ascending => " ▲",
                    SortOrder::Descending => " ▼",
                },
                _ => "",
            };
            Cell::from(format!("{}:{}{arrow}", n + 1, column.title()))
        }))
        .collect();

    let focused = app.focus == Focus::Results;
    let title = if app.results_query.is_empty() {
        format!(" Results {} ", app.results.len())
    } else {
        format!(" Results {}/{} ", app.view.len(), app.results.len())
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(50),
            Constraint::Percentage(13),
            Constraint::Percentage(10),
        ],
    )
    .header(
        Row::new(header).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused))
            .title(title),
    )
    .row_highlight_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });

    let mut state = TableState::default().with_selected(if app.view.is_empty() {
        None
    } else {
        Some(app.result_cursor)
    });
    f.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let total: u64 = app.view.iter().filter_map(|&i| app.results.get(i)).map(|r| r.size).sum();
    let mut spans = vec![
        Span::styled(
            format!(" {} files, {} ", app.view.len(), bytesize::ByteSize(total)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            " | Tab: switch pane | F10: menu | F1: help",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(run) = &app.run {
        spans.push(Span::styled(
            format!("  [{} running]", run.kind()),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(msg) = &app.message {
        spans.push(Span::styled(
            format!("  {msg}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn menu_list(items: &[MenuItem], selected: usize) -> List<'static> {
    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(Span::styled(format!("{prefix}{}", item.label), style))
        })
        .collect();
    List::new(items)
}

fn render_menu_dropdown(f: &mut Frame, menu: usize, selected: usize, bar: Rect) {
    let items = MENUS[menu].items;
    let width = items.iter().map(|i| i.label.len() as u16).max().unwrap_or(0) + 6;
    let height = items.len() as u16 + 2;
    let screen = f.area();
    let x = (bar.x + menu_title_x(menu)).min(screen.width.saturating_sub(width));
    let area = Rect::new(x, bar.y + 1, width, height).intersection(screen);

    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(menu_list(items, selected), inner);

    if let Some(item) = items.get(selected) {
        let hint = Rect::new(
            screen.x,
            screen.y + screen.height.saturating_sub(1),
            screen.width,
            1,
        );
        f.render_widget(Clear, hint);
        f.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}  (Enter: select  Esc: close  ←/→: switch menu)", item.description),
                Style::default().fg(Color::DarkGray),
            )),
            hint,
        );
    }
}

fn render_popup_menu(f: &mut Frame, title: &str, items: &[MenuItem], selected: usize) {
    let height = items.len() as u16 + 4; // borders + footer
    let width = 35;
    let area = centered_rect(width, height, f.area());

    f.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(menu_list(items, selected), chunks[0]);

    let footer = Paragraph::new(Span::styled(
        " Enter: select  Esc: cancel",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(footer, chunks[1]);
}

fn render_confirm_dialog(f: &mut Frame, action: &str) {
    let width = 40;
    let height = 5;
    let area = centered_rect(width, height, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {action} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = Paragraph::new(vec![
        Line::from("Delete files for the selected options?"),
        Line::from(""),
        Line::from(Span::styled(
            "y: yes  n/Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(text, inner);
}

fn render_message_popup(f: &mut Frame, title: &str, message: &str) {
    let lines: Vec<Line> = message.lines().map(|l| Line::from(l.to_string())).collect();
    let width = message
        .lines()
        .map(|l| l.chars().count() as u16)
        .max()
        .unwrap_or(0)
        .saturating_add(4)
        .clamp(30, f.area().width.saturating_sub(4).max(30));
    let height = lines.len() as u16 + 4;
    let area = centered_rect(width, height, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut text = lines;
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press Enter/Esc to close",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use scour_core::catalog::Catalog;
    use scour_core::config::Config;
    use scour_core::options::OptionTree;

    use super::*;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app() -> App {
        let tree = OptionTree::from_catalog(&Catalog::default()).unwrap();
        App::with_home(Config::default(), tree, PathBuf::from("/home/tester"))
    }

    #[test]
    fn draws_shell() {
        let out = screen(&app());
        for text in ["File", "Edit", "Help", "F5 Preview", "F8 Whitelist", "Firefox", "Passwords", "Filename"] {
            assert!(out.contains(text), "missing {text:?}");
        }
    }

    #[test]
    fn hidden_options_are_not_drawn() {
        let mut app = app();
        app.set_search("clip");
        let out = screen(&app);
        assert!(out.contains("System"));
        assert!(out.contains("Clipboard"));
        assert!(!out.contains("Firefox"));
    }

    #[test]
    fn popups_render() {
        let mut app = app();
        app.dispatch(Command::About);
        assert!(screen(&app).contains("Results are simulated"));
        app.overlay = Overlay::Menu {
            menu: 0,
            selected: 2,
        };
        assert!(screen(&app).contains("Wipe free space"));
    }
}
