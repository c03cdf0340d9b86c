use crate::app::{App, Focus};
use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Preview;
    let theme = &app.config.theme;
    let block = crate::ui::styled_block("Details", focused, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(event) = app.current_event() else {
        let empty = Paragraph::new("Select an event")
            .style(Style::default().fg(theme.parse_color(&theme.text_muted)));
        f.render_widget(empty, inner);
        return;
    };

    let muted = Style::default().fg(theme.parse_color(&theme.text_muted));
    let status = event.status();
    let status_style = Style::default().fg(theme.status_color(status));

    let mut lines: Vec<Line> = Vec::new();

    // Header: status icon + entity › check
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} ", status.map(|s| s.icon()).unwrap_or("·")),
            status_style,
        ),
        Span::styled(
            format!("{} › {}", event.entity_name(), event.check_name()),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ),
    ]));
    lines.push(Line::from(""));

    let field = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), muted),
            Span::styled(value, style),
        ])
    };

    lines.push(field(
        "Status",
        status.map(|s| s.label().to_string()).unwrap_or_else(|| "-".into()),
        status_style,
    ));
    let last_seen = match event.timestamp_utc() {
        Some(ts) => format!(
            "{} ({})",
            ts.format("%Y-%m-%d %H:%M:%S UTC"),
            event.age(Utc::now())
        ),
        None => "-".to_string(),
    };
    lines.push(field("Last seen", last_seen, Style::default()));
    lines.push(field("Event ID", event.id.clone(), muted));

    if app.selection.is_selected(&event.id) {
        lines.push(field(
            "Selected",
            "yes".into(),
            Style::default().fg(theme.parse_color(&theme.highlight)),
        ));
    }
    if let Some(error) = app.resolve_progress.failed.get(&event.id) {
        lines.push(field(
            "Resolve",
            format!("failed: {error}"),
            Style::default().fg(theme.parse_color(&theme.status_critical)),
        ));
    }

    if let Some(check) = &event.check {
        if !check.silenced.is_empty() {
            lines.push(field("Silenced", check.silenced.join(", "), muted));
        }
        if !check.history.is_empty() {
            let history: Vec<Span> = check
                .history
                .iter()
                .map(|h| {
                    let status = crate::filter::CheckStatus::from_code(h.status);
                    Span::styled(status.icon(), Style::default().fg(theme.status_color(Some(status))))
                })
                .collect();
            let mut spans = vec![Span::styled(format!("{:<11}", "History"), muted)];
            spans.extend(history);
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Output",
            Style::default().add_modifier(Modifier::BOLD),
        )));

        let width = inner.width.saturating_sub(1).max(10) as usize;
        if check.output.trim().is_empty() {
            lines.push(Line::from(Span::styled("(no output)", muted)));
        } else {
            for raw in check.output.lines() {
                for wrapped in textwrap::wrap(raw, width) {
                    lines.push(Line::from(wrapped.into_owned()));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).scroll((app.preview_scroll, 0));
    f.render_widget(paragraph, inner);
}
