use crate::app::{App, Focus, InputMode};
use crate::filter::FilterChoice;
use crate::ui;
use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // Try loading from cache first for instant startup
    let has_cache = app.load_from_cache();

    if has_cache {
        if let Some(age) = app.cache_age {
            let mins = age / 60;
            if mins > 0 {
                app.set_status(format!("Cached ({mins}m ago) - press r to refresh"));
            } else {
                app.set_status(format!("Cached ({age}s ago) - press r to refresh"));
            }
        }
    } else {
        // No cache: must load from API (blocking)
        app.set_loading(true, "Loading organizations...");
        terminal.draw(|f| ui::draw(f, app))?;

        if let Err(e) = app.load_viewer().await {
            app.set_error(format!("Failed to load organizations: {e:#}"));
        } else {
            app.set_loading(true, "Loading events...");
            terminal.draw(|f| ui::draw(f, app))?;

            if let Err(e) = app.load_environment().await {
                app.set_error(format!("Failed to load events: {e:#}"));
            } else {
                app.save_to_cache();
                app.cache_age = Some(0);
            }
        }
        app.set_loading(false, "");
    }

    let mut last_refresh = Instant::now();
    let mut last_spinner_tick = Instant::now();
    let refresh_interval = Duration::from_secs(app.config.settings.refresh_interval);
    let spinner_interval = Duration::from_millis(80);

    loop {
        if (app.loading || app.resolve_progress.is_running())
            && last_spinner_tick.elapsed() >= spinner_interval
        {
            app.tick_spinner();
            last_spinner_tick = Instant::now();
        }

        // Drain finished resolve requests (non-blocking)
        app.poll_resolve();

        // Clear status messages after 5 seconds
        app.clear_expired_status();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(app, key).await? {
                    return Ok(());
                }
            }
        }

        let idle = !app.loading && app.input_mode == InputMode::Normal;

        // Resolved events drop out of the list on the next fetch
        if idle && app.needs_refresh && !app.resolve_progress.is_running() {
            app.needs_refresh = false;
            refresh(app).await;
            last_refresh = Instant::now();
        }

        if idle
            && !refresh_interval.is_zero()
            && !app.resolve_progress.is_running()
            && last_refresh.elapsed() >= refresh_interval
        {
            background_refresh(app).await;
            last_refresh = Instant::now();
        }
    }
}

/// Reload the events of the current namespace with the current query params
async fn refresh(app: &mut App) {
    app.set_loading(true, "Loading events...");
    match app.load_environment().await {
        Ok(()) => {
            app.save_to_cache();
            app.cache_age = Some(0);
        }
        Err(e) => app.set_error(format!("Failed to load events: {e:#}")),
    }
    app.set_loading(false, "");
}

/// Periodic refresh; failures are logged but do not interrupt the user
async fn background_refresh(app: &mut App) {
    match app.load_environment().await {
        Ok(()) => {
            app.save_to_cache();
            app.cache_age = Some(0);
        }
        Err(e) => tracing::warn!("Background refresh failed: {e:#}"),
    }
}

/// Apply a filter menu choice and refetch
async fn apply_filter(app: &mut App, choice: FilterChoice) {
    app.filter_input.clear();
    app.input_mode = InputMode::Normal;
    if app.apply_filter(choice) {
        refresh(app).await;
    }
}

fn open_in_browser(app: &mut App, url: &str) {
    tracing::debug!(url, "opening browser");
    match open::that(url) {
        Ok(()) => app.set_status(format!("Opened {url}")),
        Err(e) => app.set_error(format!("Failed to open browser: {e}")),
    }
}

fn copy_to_clipboard(app: &mut App, text: &str) {
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
        Ok(()) => app.set_status(format!("Copied {text}")),
        Err(e) => app.set_error(format!("Failed to copy: {e}")),
    }
}

/// Shared key handling for the entity, check, status and sort dropdowns.
/// Typing narrows the entity and check lists.
async fn handle_dropdown_key(app: &mut App, key: KeyEvent, typeable: bool) {
    let len = app.dropdown_len();
    match key.code {
        KeyCode::Esc => {
            app.filter_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Down => app.dropdown_next(len),
        KeyCode::Up => app.dropdown_prev(len),
        KeyCode::Char('j') if !typeable => app.dropdown_next(len),
        KeyCode::Char('k') if !typeable => app.dropdown_prev(len),
        KeyCode::Enter => match app.dropdown_choice() {
            Some(choice) => apply_filter(app, choice).await,
            None => {
                app.filter_input.clear();
                app.input_mode = InputMode::Normal;
            }
        },
        KeyCode::Backspace if typeable => {
            app.filter_input.pop();
            app.dropdown_list_state.select(Some(0));
        }
        KeyCode::Char(c) if typeable => {
            app.filter_input.push(c);
            app.dropdown_list_state.select(Some(0));
        }
        _ => {}
    }
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Clear status on any keypress
    app.clear_status();

    match app.input_mode {
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        },

        InputMode::NamespaceSelect => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Char('j') | KeyCode::Down => app.namespace_menu_step(true),
            KeyCode::Char('k') | KeyCode::Up => app.namespace_menu_step(false),
            KeyCode::Char('o') => {
                if let Some(ns) = app.chosen_namespace() {
                    let url = app.dashboard_url(&ns);
                    open_in_browser(app, &url);
                }
            }
            KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
                if let Some(ns) = app.chosen_namespace() {
                    if app.namespace.as_ref() != Some(&ns) {
                        app.switch_namespace(ns);
                        refresh(app).await;
                    }
                }
            }
            _ => {}
        },

        InputMode::FilterEntity | InputMode::FilterCheck => {
            handle_dropdown_key(app, key, true).await;
        }

        InputMode::FilterStatus | InputMode::Sort => {
            handle_dropdown_key(app, key, false).await;
        }

        InputMode::Search => match key.code {
            KeyCode::Esc => {
                app.search_query.clear();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let expr = std::mem::take(&mut app.search_query);
                apply_filter(app, FilterChoice::Raw(expr)).await;
            }
            KeyCode::Backspace => {
                app.search_query.pop();
            }
            KeyCode::Char(c) => app.search_query.push(c),
            _ => {}
        },

        InputMode::ConfirmResolve => match key.code {
            KeyCode::Esc | KeyCode::Char('n') => app.input_mode = InputMode::Normal,
            KeyCode::Char('y') | KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
                app.start_resolve();
            }
            _ => {}
        },

        InputMode::Normal => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('d') => match app.focus {
                        Focus::Events => app.list_jump_down(),
                        Focus::Preview => app.preview_scroll = app.preview_scroll.saturating_add(20),
                    },
                    KeyCode::Char('u') => match app.focus {
                        Focus::Events => app.list_jump_up(),
                        Focus::Preview => app.preview_scroll = app.preview_scroll.saturating_sub(20),
                    },
                    KeyCode::Char('c') => return Ok(true), // Ctrl+C to quit
                    _ => {}
                }
                return Ok(false);
            }

            let kb = app.config.keybindings.clone();
            match key.code {
                KeyCode::Char(c) if c == kb.quit => return Ok(true),
                KeyCode::Char(c) if c == kb.help => app.input_mode = InputMode::Help,

                // Navigation
                KeyCode::Down => app.list_next(),
                KeyCode::Up => app.list_prev(),
                KeyCode::Char(c) if c == kb.down => match app.focus {
                    Focus::Events => app.list_next(),
                    Focus::Preview => app.scroll_preview_down(),
                },
                KeyCode::Char(c) if c == kb.up => match app.focus {
                    Focus::Events => app.list_prev(),
                    Focus::Preview => app.scroll_preview_up(),
                },
                KeyCode::Char(c) if c == kb.top => app.list_top(),
                KeyCode::Char(c) if c == kb.bottom => app.list_bottom(),
                KeyCode::Char(c) if c == kb.left => app.focus = Focus::Events,
                KeyCode::Char(c) if c == kb.right => app.focus = Focus::Preview,
                KeyCode::Tab => {
                    app.focus = match app.focus {
                        Focus::Events => Focus::Preview,
                        Focus::Preview => Focus::Events,
                    };
                }

                // Selection
                KeyCode::Char(c) if c == kb.select => app.toggle_select_current(),
                KeyCode::Char(c) if c == kb.select_all => app.toggle_select_all(),
                KeyCode::Char(c) if c == kb.resolve => {
                    if app.resolve_progress.is_running() {
                        app.set_error("Resolve already in progress");
                    } else if app.selection.is_any_selected() {
                        app.input_mode = InputMode::ConfirmResolve;
                    } else {
                        app.set_error("No events selected");
                    }
                }
                KeyCode::Esc => {
                    if app.selection.is_any_selected() {
                        app.selection.reset();
                        app.set_status("Selection cleared");
                    }
                }

                // Filters
                KeyCode::Char(c) if c == kb.filter_entity => app.open_filter_menu(InputMode::FilterEntity),
                KeyCode::Char(c) if c == kb.filter_check => app.open_filter_menu(InputMode::FilterCheck),
                KeyCode::Char(c) if c == kb.filter_status => app.open_filter_menu(InputMode::FilterStatus),
                KeyCode::Char(c) if c == kb.sort => app.open_filter_menu(InputMode::Sort),
                KeyCode::Char(c) if c == kb.search => {
                    app.open_filter_menu(InputMode::Search);
                    if app.input_mode == InputMode::Search {
                        app.search_query = app.params.filter.clone().unwrap_or_default();
                    }
                }
                KeyCode::Char(c) if c == kb.clear_filters => {
                    if app.selection.is_any_selected() {
                        app.set_error("Clear the selection to change filters");
                    } else if app.clear_filters() {
                        refresh(app).await;
                        app.set_status("Filters cleared");
                    }
                }

                // Other
                KeyCode::Char(c) if c == kb.select_namespace => app.open_namespace_menu(),
                KeyCode::Char(c) if c == kb.refresh => {
                    if app.organizations.is_empty() {
                        if let Err(e) = app.load_viewer().await {
                            app.set_error(format!("Failed to load organizations: {e:#}"));
                            return Ok(false);
                        }
                    }
                    refresh(app).await;
                    if !app.status_is_error {
                        app.set_status("Refreshed");
                    }
                }
                KeyCode::Char(c) if c == kb.open => {
                    if let Some(ns) = app.namespace.clone() {
                        let url = app.dashboard_url(&ns);
                        open_in_browser(app, &url);
                    }
                }
                KeyCode::Char(c) if c == kb.copy_id => {
                    if let Some(id) = app.current_event().map(|e| e.id.clone()) {
                        copy_to_clipboard(app, &id);
                    }
                }

                _ => {}
            }
        }
    }

    Ok(false)
}
