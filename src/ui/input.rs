use crate::app::App;
use crate::namespace::MenuRow;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

pub fn draw_namespace_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.config.theme;
    let current = app.namespace.clone();

    let items: Vec<ListItem> = app
        .namespace_rows
        .iter()
        .map(|row| match row {
            MenuRow::Environment {
                namespace,
                colour_id,
                current_org,
            } => {
                let marker = if current.as_ref() == Some(namespace) { "● " } else { "  " };
                let style = if *current_org {
                    Style::default().fg(theme.parse_color(&theme.text))
                } else {
                    Style::default().fg(theme.parse_color(&theme.text_muted))
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        "■ ",
                        Style::default().fg(theme.environment_color(colour_id.as_deref())),
                    ),
                    Span::styled(namespace.to_string(), style),
                ]))
            }
            MenuRow::Separator => ListItem::new(Line::from(Span::styled(
                "─".repeat(36),
                Style::default().fg(Color::DarkGray),
            ))),
        })
        .collect();

    draw_dropdown(f, app, area, " Namespace (o: open in browser) ", items);
}

pub fn draw_entity_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered_entities()
        .into_iter()
        .map(ListItem::new)
        .collect();

    let filter_input = app.filter_input.clone();
    draw_fuzzy_dropdown(f, app, area, " Filter by Entity ", items, &filter_input);
}

pub fn draw_check_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered_checks()
        .into_iter()
        .map(ListItem::new)
        .collect();

    let filter_input = app.filter_input.clone();
    draw_fuzzy_dropdown(f, app, area, " Filter by Check ", items, &filter_input);
}

pub fn draw_status_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.config.theme;
    let items: Vec<ListItem> = app
        .status_choices()
        .into_iter()
        .map(|(label, status, _)| {
            let icon = status.map(|s| s.icon()).unwrap_or("◆");
            let color = match status {
                Some(_) => theme.status_color(status),
                None => theme.parse_color(&theme.status_critical),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::raw(label),
            ]))
        })
        .collect();

    draw_dropdown(f, app, area, " Filter by Status ", items);
}

pub fn draw_sort_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let current = app.params.order;
    let items: Vec<ListItem> = app
        .sort_choices()
        .into_iter()
        .map(|order| {
            let marker = if order == current { "● " } else { "  " };
            ListItem::new(format!("{marker}{}", order.label()))
        })
        .collect();

    draw_dropdown(f, app, area, " Sort ", items);
}

fn draw_dropdown(f: &mut Frame, app: &mut App, area: Rect, title: &str, items: Vec<ListItem>) {
    let height = (items.len() + 2).min(15) as u16;
    let inner = super::centered_rect(40, height, area);
    f.render_widget(Clear, inner);

    let block = Block::default().borders(Borders::ALL).title(title);

    let list = List::new(items).block(block).highlight_style(
        Style::default().bg(app.config.theme.parse_color(&app.config.theme.selected_bg)),
    );

    f.render_stateful_widget(list, inner, &mut app.dropdown_list_state);
}

fn draw_fuzzy_dropdown(
    f: &mut Frame,
    app: &mut App,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    filter_input: &str,
) {
    // +3 for input box, +2 for borders
    let height = (items.len() + 5).min(18) as u16;
    let inner = super::centered_rect(50, height, area);
    f.render_widget(Clear, inner);

    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(block, inner);

    let content = Rect::new(
        inner.x + 1,
        inner.y + 1,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(2),
    );

    let search_area = Rect::new(content.x, content.y, content.width, 1);
    let display_text = format!("🔍 {filter_input}");
    f.render_widget(
        Paragraph::new(display_text).style(Style::default().fg(Color::White)),
        search_area,
    );

    let separator = "─".repeat(content.width as usize);
    let sep_area = Rect::new(content.x, content.y + 1, content.width, 1);
    f.render_widget(
        Paragraph::new(separator).style(Style::default().fg(Color::DarkGray)),
        sep_area,
    );

    // Cursor after the search icon and text
    f.set_cursor_position(Position::new(
        search_area.x + 3 + filter_input.chars().count() as u16,
        search_area.y,
    ));

    let list_area = Rect::new(
        content.x,
        content.y + 2,
        content.width,
        content.height.saturating_sub(2),
    );
    if items.is_empty() {
        f.render_widget(
            Paragraph::new("No matches").style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return;
    }
    let list = List::new(items).highlight_style(
        Style::default().bg(app.config.theme.parse_color(&app.config.theme.selected_bg)),
    );
    f.render_stateful_widget(list, list_area, &mut app.dropdown_list_state);
}

/// Free-form filter expression, e.g. `Check.Status==2 && Entity.ID=='web-01'`
pub fn draw_search_input(f: &mut Frame, app: &App, area: Rect) {
    let inner = Rect::new(area.x, area.y, area.width, 3);
    f.render_widget(Clear, inner);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Filter expression (Enter: apply, empty clears) ");

    let paragraph = Paragraph::new(app.search_query.as_str()).block(block);
    f.render_widget(paragraph, inner);

    f.set_cursor_position(Position::new(
        inner.x + 1 + app.search_query.chars().count() as u16,
        inner.y + 1,
    ));
}

pub fn draw_confirm_resolve(f: &mut Frame, app: &App, area: Rect) {
    let count = app.selected_ids().len();
    let noun = if count == 1 { "event" } else { "events" };
    let inner = super::centered_rect(44, 5, area);
    f.render_widget(Clear, inner);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.parse_color(&app.config.theme.status_warning)))
        .title(" Resolve ");

    let lines = vec![
        Line::from(format!("Resolve {count} selected {noun}?")),
        Line::from(""),
        Line::from(Span::styled("y/Enter: confirm  n/Esc: cancel", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
}
