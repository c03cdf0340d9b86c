mod events;
mod help;
mod input;

use crate::app::{App, Focus, InputMode};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Main vertical layout: header (3) + content + status bar (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Namespace/filter/sort bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status/help bar
        ])
        .split(size);

    events::draw_header(f, app, chunks[0]);

    // Main content: 55/45 horizontal split
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    events::draw_list(f, app, content[0]);
    events::draw_preview(f, app, content[1]);

    draw_status_bar(f, app, chunks[2]);

    // Overlays (modals, dropdowns, help)
    match app.input_mode {
        InputMode::Help => help::draw_popup(f, app, size),
        InputMode::NamespaceSelect => input::draw_namespace_dropdown(f, app, size),
        InputMode::FilterEntity => input::draw_entity_dropdown(f, app, size),
        InputMode::FilterCheck => input::draw_check_dropdown(f, app, size),
        InputMode::FilterStatus => input::draw_status_dropdown(f, app, size),
        InputMode::Sort => input::draw_sort_dropdown(f, app, size),
        InputMode::Search => input::draw_search_input(f, app, size),
        InputMode::ConfirmResolve => input::draw_confirm_resolve(f, app, size),
        InputMode::Normal => {}
    }

    // Loading overlay
    if app.loading {
        draw_loading(f, app, size);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.status_is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content: String = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.input_mode {
            InputMode::Normal => {
                if app.selection.is_any_selected() {
                    "space:toggle  a:all  R:resolve  Esc:clear  ?:help  q:quit".into()
                } else {
                    match app.focus {
                        Focus::Events => {
                            let age = match app.cache_age {
                                Some(age) if age >= 60 => format!("  │  cached {}m ago", age / 60),
                                _ => String::new(),
                            };
                            format!("j/k:nav  space:select  e/c/s:filter  S:sort  f:expr  x:clear  n:namespace  r:refresh  ?:help  q:quit{age}")
                        }
                        Focus::Preview => "j/k:scroll  h:back  y:copy id  o:open  ?:help  q:quit".into(),
                    }
                }
            }
            InputMode::Search => "Enter:apply  Esc:cancel".into(),
            InputMode::NamespaceSelect => "j/k:select  Enter:switch  o:open  Esc:cancel".into(),
            InputMode::ConfirmResolve => "y:resolve  n:cancel".into(),
            InputMode::Help => "Esc:close".into(),
            _ => "↑/↓:select  Enter:apply  Esc:cancel".into(),
        }
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

fn draw_loading(f: &mut Frame, app: &App, area: Rect) {
    let spinner = app.spinner_char();
    let message = if app.loading_message.is_empty() {
        "Loading..."
    } else {
        &app.loading_message
    };

    let text = format!(" {spinner} {message} ");
    let width = (text.chars().count() as u16 + 2).clamp(20, 50);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = centered_rect(width, 3, area);
    f.render_widget(Clear, inner);
    f.render_widget(block, inner);

    let text_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, text_area);
}

// Helper: create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

// Helper: styled block with focus indicator
pub fn styled_block<'a>(
    title: &'a str,
    focused: bool,
    theme: &'a crate::config::Theme,
) -> Block<'a> {
    let border_color = if focused {
        theme.parse_color(&theme.border_active)
    } else {
        theme.parse_color(&theme.border)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
}
