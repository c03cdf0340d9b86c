use crate::app::{App, Focus};
use crate::config::Theme;
use crate::selection::HeaderState;
use crate::sensu::Event;
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

pub fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Events;
    let block = crate::ui::styled_block("Events", focused, &app.config.theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Checkbox header + separator
            Constraint::Min(0),    // Rows
        ])
        .split(inner);

    draw_list_header(f, app, chunks[0]);

    let theme = &app.config.theme;
    if app.environment.events.is_empty() {
        let mut lines = vec![Line::from(Span::styled(
            "No results matched your query.",
            Style::default().fg(theme.parse_color(&theme.text)),
        ))];
        if app.params.is_filtered() {
            lines.push(Line::from(Span::styled(
                "Try refining your search query (x clears filters).",
                Style::default().fg(theme.parse_color(&theme.text_muted)),
            )));
        }
        let empty = Paragraph::new(lines).wrap(Wrap { trim: true });
        f.render_widget(empty, chunks[1]);
        return;
    }

    // Room for the highlight symbol
    let inner_width = chunks[1].width.saturating_sub(2) as usize;
    let now = Utc::now();

    let items: Vec<ListItem> = app
        .environment
        .events
        .nodes()
        .map(|event| {
            render_event(
                event,
                app.selection.is_selected(&event.id),
                app.resolve_progress.has_failed(&event.id),
                theme,
                now,
                inner_width,
            )
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(theme.parse_color(&theme.selected_bg)))
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, chunks[1], &mut app.event_list_state);
}

fn draw_list_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let total = app.event_count();
    let state = app.selection.header_state(total);
    let selected = app.selected_ids().len();

    let checkbox_style = match state {
        HeaderState::Unchecked => Style::default().fg(theme.parse_color(&theme.text_muted)),
        _ => Style::default().fg(theme.parse_color(&theme.highlight)),
    };

    let mut spans = vec![
        Span::raw("  "),
        Span::styled(state.symbol(), checkbox_style),
        Span::raw(" "),
    ];
    if selected > 0 {
        spans.push(Span::styled(
            format!("{selected} Selected"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if app.resolve_progress.is_running() {
            spans.push(Span::styled(
                format!("  {} resolving {} ", app.spinner_char(), app.resolve_progress.pending),
                Style::default().fg(theme.parse_color(&theme.status_warning)),
            ));
        } else {
            spans.push(Span::styled(
                "  R:resolve  Esc:clear",
                Style::default().fg(theme.parse_color(&theme.text_muted)),
            ));
        }
    } else {
        let more = if app.environment.events.page_info.has_next_page { "+" } else { "" };
        spans.push(Span::styled(
            format!("{total}{more} events"),
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        ));
    }

    let separator = "─".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max_chars {
        let truncated: String = chars[..max_chars.saturating_sub(3)].iter().collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

fn render_event(
    event: &Event,
    is_checked: bool,
    has_failed: bool,
    theme: &Theme,
    now: DateTime<Utc>,
    available_width: usize,
) -> ListItem<'static> {
    let status = event.status();
    let status_color = theme.status_color(status);
    let icon = status.map(|s| s.icon()).unwrap_or("·");
    let checkbox = if is_checked { "[x]" } else { "[ ]" };
    let age = event.age(now);

    let mut markers = String::new();
    if has_failed {
        markers.push_str(" ✗");
    }
    if event.is_silenced() {
        markers.push_str(" 🔕");
    }
    if event.is_resolution() {
        markers.push_str(" ✓");
    }

    // checkbox(4) + icon(2) + age + markers + spacing
    let fixed = 4 + 2 + age.chars().count() + markers.chars().count() + 2;
    let label = format!("{} › {}", event.entity_name(), event.check_name());
    let label = truncate_str(&label, available_width.saturating_sub(fixed));
    let padding = available_width
        .saturating_sub(fixed + label.chars().count())
        .max(1);

    let checkbox_style = if is_checked {
        Style::default().fg(theme.parse_color(&theme.highlight))
    } else {
        Style::default().fg(theme.parse_color(&theme.text_muted))
    };

    let spans = vec![
        Span::styled(format!("{checkbox} "), checkbox_style),
        Span::styled(format!("{icon} "), Style::default().fg(status_color)),
        Span::styled(label, Style::default().fg(theme.parse_color(&theme.text))),
        Span::raw(" ".repeat(padding)),
        Span::styled(age, Style::default().fg(theme.parse_color(&theme.text_muted))),
        Span::styled(
            markers,
            Style::default().fg(theme.parse_color(&theme.status_critical)),
        ),
    ];

    ListItem::new(Line::from(spans))
}
