use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Namespace
            Constraint::Percentage(50), // Filter
            Constraint::Percentage(20), // Sort
        ])
        .split(area);

    draw_namespace(f, app, chunks[0]);
    draw_filter(f, app, chunks[1]);
    draw_sort(f, app, chunks[2]);
}

fn draw_namespace(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let colour_id = app.namespace.as_ref().and_then(|ns| {
        app.organizations
            .iter()
            .find(|org| org.name == ns.organization)
            .and_then(|org| org.environments.iter().find(|env| env.name == ns.environment))
            .and_then(|env| env.colour_id.as_deref())
    });

    let line = match &app.namespace {
        Some(ns) => Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.environment_color(colour_id))),
            Span::raw(ns.to_string()),
        ]),
        None => Line::from("No namespace"),
    };

    let block = Block::default().borders(Borders::ALL).title(" Namespace [n] ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_filter(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let block = Block::default().borders(Borders::ALL).title(" Filter [f] ");

    let text = match &app.params.filter {
        Some(filter) => Paragraph::new(filter.as_str())
            .style(Style::default().fg(theme.parse_color(&theme.highlight))),
        None => Paragraph::new("none")
            .style(Style::default().fg(theme.parse_color(&theme.text_muted))),
    };
    f.render_widget(text.block(block), area);
}

fn draw_sort(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Sort [S] ");
    let text = Paragraph::new(app.params.order.label()).block(block);
    f.render_widget(text, area);
}
