// UI rendering logic
use crate::app::{App, DetailState, InputMode, View};
use pokescout_core::favorites::MAX_FAVORITES;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search_input(frame, app, chunks[1]);

    match app.view {
        View::List => render_pokemon_list(frame, app, chunks[2]),
        View::Favorites => render_favorites(frame, app, chunks[2]),
    }

    render_status_bar(frame, app, chunks[3]);

    if app.detail.is_some() {
        render_detail_popup(frame, app, frame.area());
    }

    if app.input_mode == InputMode::EditingAlias {
        render_alias_editor(frame, app, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled(
        "PokeScout",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(logo, header_chunks[0]);

    let context = match app.view {
        View::List => {
            if app.search.is_some() {
                format!("Search: {}", app.search_input.trim())
            } else {
                let pages = app.total_pages().max(1);
                format!(
                    "Page {}/{} · {} pokemon · {} per page",
                    app.page_index + 1,
                    pages,
                    app.total,
                    app.page_size
                )
            }
        }
        View::Favorites => format!("Favorites {}/{}", app.favorites.len(), MAX_FAVORITES),
    };

    let context_widget = Paragraph::new(Line::from(context))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(context_widget, header_chunks[1]);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let (border_style, title) = if app.input_mode == InputMode::Searching {
        (Style::default().fg(Color::Yellow), " Search (exact name) ")
    } else {
        (Style::default(), " Search - press / ")
    };

    let input = Paragraph::new(app.search_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(input, area);
}

fn render_pokemon_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Pokemon ");

    // An active search overlay owns the content area; the paged states
    // only show when no query is live.
    if let Some(search) = &app.search {
        if search.loading {
            let loading = Paragraph::new("Searching...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }
        if let Some(error) = &search.error {
            let miss = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(miss, area);
            return;
        }
    } else {
        if app.loading {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }

        if let Some(error) = &app.error_message {
            let error_widget = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(error_widget, area);
            return;
        }
    }

    let items: Vec<ListItem> = app
        .visible_items()
        .iter()
        .map(|item| {
            let marker = if app.is_favorite(item.id) { "★" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{marker} "),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("#{:<5}", item.id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(item.name.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_favorites(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Favorites ");

    if app.favorites.is_empty() {
        let empty = Paragraph::new("No favorites yet. Press 'f' on a pokemon to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .favorites
        .iter()
        .map(|entry| {
            let added = entry.created_at.format("%Y-%m-%d %H:%M");
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.alias.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({})", entry.name),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("  added {added}"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.favorites_state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(message) = &app.status_message {
        Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        ))
    } else {
        let hints = match (app.input_mode, app.view) {
            (InputMode::Searching, _) => {
                "SEARCH | type a name | ENTER: search now | ESC: done"
            }
            (InputMode::EditingAlias, _) => "EDIT ALIAS | ENTER: save | ESC: cancel",
            (_, View::List) => {
                "j/k: move | n/p: page | s: page size | f: favorite | ENTER: details | /: search | F: favorites | q: quit"
            }
            (_, View::Favorites) => {
                "j/k: move | r: remove | e: edit alias | ENTER: details | F/ESC: back | q: quit"
            }
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<Line> = match app.detail.as_ref() {
        Some(DetailState::Loading { title }) => vec![
            Line::from(Span::styled(
                title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        Some(DetailState::Failed(message)) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        Some(DetailState::Loaded(details)) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        details.name.clone(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  #{}", details.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(""),
                Line::from(format!("Species: {}", details.species)),
                Line::from(format!("Types: {}", details.types.join(", "))),
                Line::from(format!("Abilities: {}", details.abilities.join(", "))),
                Line::from(""),
                Line::from(format!(
                    "Height: {}  Weight: {}  Base exp: {}  Order: {}",
                    details.height, details.weight, details.base_experience, details.order
                )),
                Line::from(""),
                Line::from(Span::styled("Stats", Style::default().add_modifier(Modifier::BOLD))),
            ];
            for stat in &details.stats {
                lines.push(Line::from(format!("  {:<16} {}", stat.name, stat.value)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "Moves: {}  Forms: {}  Held items: {}",
                details.moves_count, details.forms_count, details.held_items_count
            )));
            lines
        }
        None => Vec::new(),
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(paragraph, popup);
}

fn render_alias_editor(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Edit alias ")
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines = vec![Line::from(app.alias_input.as_str())];
    if let Some(error) = &app.alias_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, popup);
}

/// Helper to build a centered rect using a percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
