use crate::cache::{self, CacheEntry};
use crate::config::Config;
use crate::filter::{self, CheckStatus, FilterChoice, QueryParams, SortOrder, StatusFilter};
use crate::namespace::{self, MenuRow, Namespace};
use crate::resolve::{self, ResolveOutcome, ResolveProgress};
use crate::selection::SelectionState;
use crate::sensu::{EnvironmentData, Event, Organization, SensuClient};
use anyhow::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::ListState;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Events,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    NamespaceSelect,
    FilterEntity,
    FilterCheck,
    FilterStatus,
    Sort,
    Search,
    ConfirmResolve,
    Help,
}

pub struct App {
    // Config
    pub config: Config,
    pub client: Option<Arc<SensuClient>>,

    // UI state
    pub focus: Focus,
    pub input_mode: InputMode,

    // Data
    pub namespace: Option<Namespace>,
    pub organizations: Vec<Organization>,
    pub environment: EnvironmentData,
    pub params: QueryParams,

    // Checkbox selection and bulk resolve
    pub selection: SelectionState,
    pub resolve_progress: ResolveProgress,
    pub resolve_rx: Option<mpsc::Receiver<ResolveOutcome>>,
    resolve_tx: Option<mpsc::Sender<ResolveOutcome>>,
    pub needs_refresh: bool,

    // List state
    pub event_list_state: ListState,
    pub dropdown_list_state: ListState,
    pub namespace_rows: Vec<MenuRow>,
    pub preview_scroll: u16,

    // Input
    pub filter_input: String,
    pub search_query: String,
    pub fuzzy_matcher: SkimMatcherV2,

    // Status
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub status_set_at: Option<std::time::Instant>,
    pub loading: bool,
    pub spinner_frame: usize,
    pub loading_message: String,
    pub cache_age: Option<u64>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = match SensuClient::new(&config.api) {
            Ok(client) => Some(Arc::new(client.with_timeout(config.settings.api_timeout))),
            Err(e) => {
                tracing::error!("API client unavailable: {e:#}");
                None
            }
        };
        let namespace = config.initial_namespace().unwrap_or_else(|e| {
            tracing::warn!("Ignoring configured namespace: {e}");
            None
        });

        Self {
            config,
            client,
            focus: Focus::Events,
            input_mode: InputMode::Normal,
            namespace,
            organizations: Vec::new(),
            environment: EnvironmentData::default(),
            params: QueryParams::default(),
            selection: SelectionState::new(),
            resolve_progress: ResolveProgress::default(),
            resolve_rx: None,
            resolve_tx: None,
            needs_refresh: false,
            event_list_state: ListState::default(),
            dropdown_list_state: ListState::default(),
            namespace_rows: Vec::new(),
            preview_scroll: 0,
            filter_input: String::new(),
            search_query: String::new(),
            fuzzy_matcher: SkimMatcherV2::default(),
            status_message: None,
            status_is_error: false,
            status_set_at: None,
            loading: false,
            spinner_frame: 0,
            loading_message: String::new(),
            cache_age: None,
        }
    }

    fn client(&self) -> Result<Arc<SensuClient>> {
        self.client
            .clone()
            .ok_or_else(|| anyhow::anyhow!("API client unavailable"))
    }

    pub async fn load_viewer(&mut self) -> Result<()> {
        let client = self.client()?;
        self.organizations = client.viewer().await?.organizations;

        if self.namespace.is_none() {
            self.namespace = Namespace::first_available(&self.organizations);
            if let Some(ns) = &self.namespace {
                tracing::info!(namespace = %ns, "no namespace configured, using first available");
            }
        }
        Ok(())
    }

    pub async fn load_environment(&mut self) -> Result<()> {
        let client = self.client()?;
        let namespace = self
            .namespace
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No namespace available"))?;

        let environment = client.environment(&namespace, &self.params).await?;
        self.set_environment(environment);
        Ok(())
    }

    /// Replace the listed data, keeping the cursor on the same event when possible
    pub fn set_environment(&mut self, environment: EnvironmentData) {
        let current_id = self.current_event().map(|e| e.id.clone());
        self.environment = environment;

        let ids: HashSet<&str> = self.environment.events.nodes().map(|e| e.id.as_str()).collect();
        self.selection.retain(ids.iter().copied());
        self.resolve_progress.failed.retain(|id, _| ids.contains(id.as_str()));

        let len = self.environment.events.len();
        let position = current_id
            .and_then(|id| self.environment.events.nodes().position(|e| e.id == id))
            .or_else(|| self.event_list_state.selected().map(|i| i.min(len.saturating_sub(1))));
        self.event_list_state
            .select(if len == 0 { None } else { Some(position.unwrap_or(0)) });
    }

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn spinner_char(&self) -> &'static str {
        const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER[self.spinner_frame]
    }

    /// Load the current namespace from cache if it is fresh enough
    pub fn load_from_cache(&mut self) -> bool {
        let Some(namespace) = &self.namespace else {
            return false;
        };
        let Some(entry) = cache::load(namespace) else {
            return false;
        };

        let age = entry.age_seconds();
        if age > self.config.settings.cache_expiry {
            tracing::debug!(age, "cache expired");
            return false;
        }

        self.organizations = entry.organizations;
        self.params = entry.params;
        self.set_environment(entry.environment);
        self.cache_age = Some(age);
        true
    }

    pub fn save_to_cache(&self) {
        let Some(namespace) = &self.namespace else {
            return;
        };
        let entry = CacheEntry::new(
            self.organizations.clone(),
            self.environment.clone(),
            self.params.clone(),
        );
        if let Err(e) = cache::save(namespace, &entry) {
            tracing::warn!("Failed to write cache: {e:#}");
        }
    }

    // Events list

    pub fn event_count(&self) -> usize {
        self.environment.events.len()
    }

    pub fn current_event(&self) -> Option<&Event> {
        self.event_list_state
            .selected()
            .and_then(|i| self.environment.events.edges.get(i))
            .map(|edge| &edge.node)
    }

    pub fn list_next(&mut self) {
        let len = self.event_count();
        if len == 0 {
            return;
        }
        let i = self
            .event_list_state
            .selected()
            .map(|i| (i + 1).min(len - 1))
            .unwrap_or(0);
        self.event_list_state.select(Some(i));
        self.preview_scroll = 0;
    }

    pub fn list_prev(&mut self) {
        if self.event_count() == 0 {
            return;
        }
        let i = self
            .event_list_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.event_list_state.select(Some(i));
        self.preview_scroll = 0;
    }

    pub fn list_top(&mut self) {
        if self.event_count() > 0 {
            self.event_list_state.select(Some(0));
            self.preview_scroll = 0;
        }
    }

    pub fn list_bottom(&mut self) {
        let len = self.event_count();
        if len > 0 {
            self.event_list_state.select(Some(len - 1));
            self.preview_scroll = 0;
        }
    }

    pub fn list_jump_down(&mut self) {
        let len = self.event_count();
        if len == 0 {
            return;
        }
        let jump = self.config.settings.page_jump;
        let i = self
            .event_list_state
            .selected()
            .map(|i| (i + jump).min(len - 1))
            .unwrap_or(0);
        self.event_list_state.select(Some(i));
        self.preview_scroll = 0;
    }

    pub fn list_jump_up(&mut self) {
        if self.event_count() == 0 {
            return;
        }
        let jump = self.config.settings.page_jump;
        let i = self
            .event_list_state
            .selected()
            .map(|i| i.saturating_sub(jump))
            .unwrap_or(0);
        self.event_list_state.select(Some(i));
        self.preview_scroll = 0;
    }

    // Selection

    pub fn toggle_select_all(&mut self) {
        self.selection
            .toggle_all(self.environment.events.nodes().map(|e| e.id.as_str()));
    }

    pub fn toggle_select_current(&mut self) {
        if let Some(id) = self.current_event().map(|e| e.id.clone()) {
            self.selection.toggle_one(&id);
        }
    }

    /// Selected event ids in display order
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selection
            .selected_in(self.environment.events.nodes().map(|e| e.id.as_str()))
    }

    fn resolve_sender(&mut self) -> mpsc::Sender<ResolveOutcome> {
        if let Some(tx) = &self.resolve_tx {
            return tx.clone();
        }
        let (tx, rx) = mpsc::channel(64);
        self.resolve_rx = Some(rx);
        self.resolve_tx = Some(tx.clone());
        tx
    }

    /// Fire one resolve request per selected event
    pub fn start_resolve(&mut self) {
        let ids: Vec<String> = self.selected_ids().into_iter().map(String::from).collect();
        if ids.is_empty() {
            self.set_error("No events selected");
            return;
        }
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        tracing::info!(count = ids.len(), "resolving events");
        let tx = self.resolve_sender();
        self.resolve_progress.start(&ids);
        self.set_status(format!("Resolving {} event(s)...", ids.len()));
        resolve::dispatch(client, ids, tx);
    }

    /// Drain finished resolve requests (non-blocking)
    pub fn poll_resolve(&mut self) {
        let mut outcomes = Vec::new();
        if let Some(rx) = &mut self.resolve_rx {
            while let Ok(outcome) = rx.try_recv() {
                outcomes.push(outcome);
            }
        }
        if outcomes.is_empty() {
            return;
        }

        for outcome in outcomes {
            self.resolve_progress.record(outcome, &mut self.selection);
        }

        if !self.resolve_progress.is_running() {
            let (resolved, failed) = self.resolve_progress.finish();
            let message = resolve::summary(resolved, failed);
            if failed > 0 {
                self.set_error(message);
            } else {
                self.set_status(message);
            }
            if resolved > 0 {
                self.needs_refresh = true;
            }
        }
    }

    // Filters

    /// Apply a filter menu choice to the query params. Returns true when the
    /// events need to be fetched again.
    pub fn apply_filter(&mut self, choice: FilterChoice) -> bool {
        let change = choice.to_query_change();
        tracing::debug!(param = change.param.as_str(), value = %change.value, "query change");
        match self.params.apply(&change) {
            Ok(()) => true,
            Err(e) => {
                self.set_error(e.to_string());
                false
            }
        }
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.params.filter.is_none() {
            return false;
        }
        self.params.filter = None;
        true
    }

    fn fuzzy_filter(&self, items: Vec<String>) -> Vec<String> {
        if self.filter_input.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| {
                self.fuzzy_matcher
                    .fuzzy_match(item, &self.filter_input)
                    .is_some()
            })
            .collect()
    }

    pub fn filtered_entities(&self) -> Vec<String> {
        self.fuzzy_filter(self.environment.entity_names())
    }

    pub fn filtered_checks(&self) -> Vec<String> {
        self.fuzzy_filter(self.environment.check_names())
    }

    pub fn status_choices(&self) -> Vec<(&'static str, Option<CheckStatus>, StatusFilter)> {
        filter::status_options()
    }

    pub fn sort_choices(&self) -> [SortOrder; 3] {
        SortOrder::ALL
    }

    /// Open one of the filter menus. Filter menus are unavailable while
    /// events are selected.
    pub fn open_filter_menu(&mut self, mode: InputMode) {
        if self.selection.is_any_selected() {
            self.set_error("Clear the selection to change filters");
            return;
        }
        self.filter_input.clear();
        self.dropdown_list_state.select(Some(0));
        self.input_mode = mode;
    }

    pub fn dropdown_len(&self) -> usize {
        match self.input_mode {
            InputMode::FilterEntity => self.filtered_entities().len(),
            InputMode::FilterCheck => self.filtered_checks().len(),
            InputMode::FilterStatus => self.status_choices().len(),
            InputMode::Sort => self.sort_choices().len(),
            _ => 0,
        }
    }

    /// The choice under the dropdown cursor in the open filter menu
    pub fn dropdown_choice(&self) -> Option<FilterChoice> {
        let idx = self.dropdown_list_state.selected()?;
        match self.input_mode {
            InputMode::FilterEntity => self.filtered_entities().get(idx).cloned().map(FilterChoice::Entity),
            InputMode::FilterCheck => self.filtered_checks().get(idx).cloned().map(FilterChoice::Check),
            InputMode::FilterStatus => self
                .status_choices()
                .into_iter()
                .nth(idx)
                .map(|(_, _, status)| FilterChoice::Status(status)),
            InputMode::Sort => self.sort_choices().get(idx).copied().map(FilterChoice::Sort),
            _ => None,
        }
    }

    pub fn dropdown_next(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self.dropdown_list_state.selected().map(|i| (i + 1) % max).unwrap_or(0);
        self.dropdown_list_state.select(Some(i));
    }

    pub fn dropdown_prev(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self
            .dropdown_list_state
            .selected()
            .map(|i| if i == 0 { max - 1 } else { i - 1 })
            .unwrap_or(0);
        self.dropdown_list_state.select(Some(i));
    }

    // Namespace menu

    pub fn open_namespace_menu(&mut self) {
        let Some(current) = &self.namespace else {
            self.set_error("No namespace available");
            return;
        };
        match namespace::menu_rows(&self.organizations, &current.organization) {
            Ok(rows) => {
                let start = rows
                    .iter()
                    .position(|row| row.namespace() == Some(current))
                    .or_else(|| rows.iter().position(MenuRow::is_selectable));
                self.namespace_rows = rows;
                self.dropdown_list_state.select(start);
                self.input_mode = InputMode::NamespaceSelect;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Move the namespace cursor by one selectable row, wrapping around
    pub fn namespace_menu_step(&mut self, forward: bool) {
        let len = self.namespace_rows.len();
        if !self.namespace_rows.iter().any(MenuRow::is_selectable) {
            return;
        }
        let mut i = self.dropdown_list_state.selected().unwrap_or(0);
        loop {
            i = if forward { (i + 1) % len } else { (i + len - 1) % len };
            if self.namespace_rows[i].is_selectable() {
                break;
            }
        }
        self.dropdown_list_state.select(Some(i));
    }

    pub fn chosen_namespace(&self) -> Option<Namespace> {
        self.dropdown_list_state
            .selected()
            .and_then(|i| self.namespace_rows.get(i))
            .and_then(|row| row.namespace().cloned())
    }

    /// Move to another namespace. Selection, filters and the listed events
    /// all belong to the old namespace and are dropped.
    pub fn switch_namespace(&mut self, namespace: Namespace) {
        tracing::info!(namespace = %namespace, "switching namespace");
        self.namespace = Some(namespace);
        self.selection.reset();
        self.resolve_progress.forget();
        // Outcomes of requests still in flight belong to the old namespace
        self.resolve_tx = None;
        self.resolve_rx = None;
        self.needs_refresh = false;
        self.params = QueryParams::default();
        self.environment = EnvironmentData::default();
        self.event_list_state.select(None);
        self.preview_scroll = 0;
        self.cache_age = None;
    }

    /// Dashboard URL for a namespace
    pub fn dashboard_url(&self, namespace: &Namespace) -> String {
        format!(
            "{}{}",
            self.config.api.dashboard_url.trim_end_matches('/'),
            namespace.path()
        )
    }

    // Status

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
        self.status_set_at = Some(std::time::Instant::now());
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!("{msg}");
        self.status_message = Some(msg);
        self.status_is_error = true;
        self.status_set_at = Some(std::time::Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
        self.status_set_at = None;
    }

    /// Clear status message if it's older than 5 seconds
    pub fn clear_expired_status(&mut self) {
        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() > std::time::Duration::from_secs(5) {
                self.clear_status();
            }
        }
    }

    pub fn scroll_preview_down(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_add(1);
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensu::{CheckResult, Connection, Edge, Environment, NamedNode};

    fn make_event(id: &str, status: u32) -> Event {
        Event {
            id: id.to_string(),
            timestamp: Some(1_700_000_000),
            entity: Some(NamedNode { name: format!("entity-{id}") }),
            check: Some(CheckResult {
                name: "check-http".to_string(),
                status,
                output: String::new(),
                silenced: vec![],
                history: vec![],
            }),
        }
    }

    fn make_environment(ids: &[&str]) -> EnvironmentData {
        EnvironmentData {
            checks: Connection {
                edges: vec![Edge { node: NamedNode { name: "check-http".into() } }],
                ..Connection::default()
            },
            entities: Connection {
                edges: ["web-01", "web-02", "db-01"]
                    .iter()
                    .map(|n| Edge { node: NamedNode { name: n.to_string() } })
                    .collect(),
                ..Connection::default()
            },
            events: Connection {
                edges: ids.iter().map(|id| Edge { node: make_event(id, 2) }).collect(),
                ..Connection::default()
            },
        }
    }

    fn make_org(name: &str, envs: &[&str]) -> Organization {
        Organization {
            name: name.to_string(),
            environments: envs
                .iter()
                .map(|e| Environment { name: e.to_string(), colour_id: None })
                .collect(),
        }
    }

    fn make_app() -> App {
        let mut app = App::new(Config::default());
        app.set_environment(make_environment(&["e1", "e2", "e3", "e4", "e5"]));
        app
    }

    #[test]
    fn test_select_two_of_five() {
        let mut app = make_app();
        app.list_next();
        app.toggle_select_current();
        app.list_next();
        app.list_next();
        app.toggle_select_current();

        assert_eq!(app.selected_ids(), vec!["e2", "e4"]);
        assert!(app.selection.is_any_selected());
        assert!(!app.selection.is_all_selected(app.event_count()));
    }

    #[test]
    fn test_toggle_select_all_roundtrip() {
        let mut app = make_app();
        app.toggle_select_all();
        assert!(app.selection.is_all_selected(5));

        app.toggle_select_all();
        assert!(app.selected_ids().is_empty());
    }

    #[test]
    fn test_reload_prunes_selection_and_keeps_cursor() {
        let mut app = make_app();
        app.toggle_select_all();
        app.list_bottom(); // e5

        app.set_environment(make_environment(&["e5", "e1", "e9"]));

        assert_eq!(app.selected_ids(), vec!["e5", "e1"]);
        assert_eq!(app.current_event().map(|e| e.id.as_str()), Some("e5"));
    }

    #[test]
    fn test_reload_to_empty_clears_cursor() {
        let mut app = make_app();
        app.set_environment(EnvironmentData::default());
        assert!(app.current_event().is_none());
        assert_eq!(app.event_list_state.selected(), None);
    }

    #[test]
    fn test_poll_resolve_partial_failure() {
        let mut app = make_app();
        app.toggle_select_all();
        let ids: Vec<String> = ["e1", "e2", "e3"].iter().map(|s| s.to_string()).collect();
        app.resolve_progress.start(&ids);

        let tx = app.resolve_sender();
        tx.try_send(ResolveOutcome::Resolved("e1".into())).unwrap();
        tx.try_send(ResolveOutcome::Failed { id: "e2".into(), error: "boom".into() }).unwrap();
        app.poll_resolve();
        assert!(app.resolve_progress.is_running());
        assert!(!app.needs_refresh);

        tx.try_send(ResolveOutcome::Resolved("e3".into())).unwrap();
        app.poll_resolve();

        assert!(!app.resolve_progress.is_running());
        assert!(app.needs_refresh);
        assert!(app.status_is_error);
        assert_eq!(app.selected_ids(), vec!["e2", "e4", "e5"]);
        assert!(app.resolve_progress.has_failed("e2"));
    }

    #[test]
    fn test_resolve_summary_is_per_batch() {
        let mut app = make_app();
        let tx = app.resolve_sender();

        app.selection.toggle_one("e1");
        app.resolve_progress.start(&["e1".to_string()]);
        tx.try_send(ResolveOutcome::Failed { id: "e1".into(), error: "boom".into() }).unwrap();
        app.poll_resolve();
        assert!(app.status_is_error);

        app.selection.reset();
        app.selection.toggle_one("e2");
        app.resolve_progress.start(&["e2".to_string()]);
        tx.try_send(ResolveOutcome::Resolved("e2".into())).unwrap();
        app.poll_resolve();

        assert!(!app.status_is_error);
        assert_eq!(app.status_message.as_deref(), Some("Resolved 1 event"));
        assert!(app.selected_ids().is_empty());
    }

    #[test]
    fn test_switch_namespace_ignores_late_outcomes() {
        let mut app = make_app();
        let old_tx = app.resolve_sender();
        app.toggle_select_all();
        let old_ids: Vec<String> = ["e1", "e2", "e3"].iter().map(|s| s.to_string()).collect();
        app.resolve_progress.start(&old_ids);

        app.switch_namespace(Namespace::new("a", "dev"));
        app.set_environment(make_environment(&["n1", "n2"]));
        app.toggle_select_all();
        let new_tx = app.resolve_sender();
        app.resolve_progress.start(&["n1".to_string(), "n2".to_string()]);

        // Old tasks finishing after the switch go nowhere
        assert!(old_tx.try_send(ResolveOutcome::Resolved("e1".into())).is_err());
        assert!(old_tx.try_send(ResolveOutcome::Resolved("e2".into())).is_err());
        app.poll_resolve();

        assert!(app.resolve_progress.is_running());
        assert_eq!(app.resolve_progress.pending, 2);
        assert!(!app.needs_refresh);
        assert_eq!(app.selected_ids(), vec!["n1", "n2"]);

        new_tx.try_send(ResolveOutcome::Resolved("n1".into())).unwrap();
        new_tx.try_send(ResolveOutcome::Resolved("n2".into())).unwrap();
        app.poll_resolve();
        assert!(!app.resolve_progress.is_running());
        assert_eq!(app.status_message.as_deref(), Some("Resolved 2 events"));
    }

    #[test]
    fn test_filter_menu_blocked_while_selected() {
        let mut app = make_app();
        app.toggle_select_current();
        app.open_filter_menu(InputMode::FilterEntity);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.status_is_error);
    }

    #[test]
    fn test_entity_menu_fuzzy_choice() {
        let mut app = make_app();
        app.open_filter_menu(InputMode::FilterEntity);
        app.filter_input = "db".into();
        assert_eq!(app.dropdown_len(), 1);

        let choice = app.dropdown_choice().unwrap();
        assert_eq!(choice, FilterChoice::Entity("db-01".into()));
        assert!(app.apply_filter(choice));
        assert_eq!(app.params.filter.as_deref(), Some("Entity.ID=='db-01'"));
    }

    #[test]
    fn test_check_menu_includes_keepalive() {
        let mut app = make_app();
        app.open_filter_menu(InputMode::FilterCheck);
        assert_eq!(app.filtered_checks(), vec!["check-http", "keepalive"]);
        app.dropdown_next(app.dropdown_len());
        assert_eq!(app.dropdown_choice(), Some(FilterChoice::Check("keepalive".into())));
    }

    #[test]
    fn test_status_and_sort_menus() {
        let mut app = make_app();
        app.open_filter_menu(InputMode::FilterStatus);
        assert!(app.apply_filter(app.dropdown_choice().unwrap()));
        assert_eq!(app.params.filter.as_deref(), Some("HasCheck && IsIncident"));

        app.open_filter_menu(InputMode::Sort);
        app.dropdown_prev(app.dropdown_len());
        assert!(app.apply_filter(app.dropdown_choice().unwrap()));
        assert_eq!(app.params.order, SortOrder::Oldest);
        assert_eq!(app.params.filter.as_deref(), Some("HasCheck && IsIncident"));

        assert!(app.clear_filters());
        assert!(!app.clear_filters());
    }

    #[test]
    fn test_namespace_menu_skips_separators() {
        let mut app = make_app();
        app.organizations = vec![make_org("a", &["dev"]), make_org("b", &["prod", "stage"])];
        app.namespace = Some(Namespace::new("b", "stage"));

        app.open_namespace_menu();
        assert_eq!(app.input_mode, InputMode::NamespaceSelect);
        assert_eq!(app.chosen_namespace(), Some(Namespace::new("b", "stage")));

        app.namespace_menu_step(true);
        assert_eq!(app.chosen_namespace(), Some(Namespace::new("a", "dev")));

        app.namespace_menu_step(true);
        assert_eq!(app.chosen_namespace(), Some(Namespace::new("b", "prod")));

        app.namespace_menu_step(false);
        assert_eq!(app.chosen_namespace(), Some(Namespace::new("a", "dev")));
    }

    #[test]
    fn test_namespace_menu_unknown_org() {
        let mut app = make_app();
        app.organizations = vec![make_org("a", &["dev"])];
        app.namespace = Some(Namespace::new("gone", "dev"));

        app.open_namespace_menu();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.status_is_error);
    }

    #[test]
    fn test_switch_namespace_resets_state() {
        let mut app = make_app();
        app.toggle_select_all();
        app.apply_filter(FilterChoice::Check("keepalive".into()));

        app.switch_namespace(Namespace::new("a", "dev"));

        assert!(!app.selection.is_any_selected());
        assert_eq!(app.params, QueryParams::default());
        assert_eq!(app.event_count(), 0);
        assert_eq!(app.dashboard_url(&Namespace::new("a", "dev")), "http://localhost:3000/a/dev/");
    }
}
