use crate::filter::CheckStatus;
use crate::namespace::{Namespace, NamespaceError};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    /// Namespace to open on startup ("organization/environment")
    pub namespace: Option<String>,
    pub theme: Theme,
    pub settings: Settings,
    pub keybindings: Keybindings,
}

/// Where the backend lives and how to authenticate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API (the GraphQL endpoint is `<url>/graphql`)
    pub url: String,
    /// Base URL of the web dashboard, used when opening a namespace in the browser
    pub dashboard_url: String,
    /// Bearer token
    pub token: Option<String>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Auto-refresh interval in seconds (0 to disable)
    pub refresh_interval: u64,
    /// Number of items to jump with Ctrl+D/U
    pub page_jump: usize,
    /// API request timeout in seconds
    pub api_timeout: u64,
    /// Cache expiry in seconds
    pub cache_expiry: u64,
    /// Default log filter when LAZYSENSU_LOG is unset
    pub log_level: String,
}

/// Customizable keybindings (single character keys)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    // Navigation
    pub down: char,
    pub up: char,
    pub left: char,
    pub right: char,
    pub top: char,
    pub bottom: char,
    // Selection
    pub select: char,
    pub select_all: char,
    pub resolve: char,
    // Filters
    pub search: char,
    pub filter_entity: char,
    pub filter_check: char,
    pub filter_status: char,
    pub sort: char,
    pub clear_filters: char,
    // Other
    pub open: char,
    pub copy_id: char,
    pub select_namespace: char,
    pub refresh: char,
    pub help: char,
    pub quit: char,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub border_active: String,
    pub selected_bg: String,
    pub text: String,
    pub text_muted: String,
    pub highlight: String,
    pub status_passing: String,
    pub status_warning: String,
    pub status_critical: String,
    pub status_unknown: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            dashboard_url: "http://localhost:3000".to_string(),
            token: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval: 60,
            page_jump: 10,
            api_timeout: 30,
            cache_expiry: 3600, // 1 hour
            log_level: "info".to_string(),
        }
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            // Navigation (vim-style)
            down: 'j',
            up: 'k',
            left: 'h',
            right: 'l',
            top: 'g',
            bottom: 'G',
            // Selection
            select: ' ',
            select_all: 'a',
            resolve: 'R',
            // Filters
            search: 'f',
            filter_entity: 'e',
            filter_check: 'c',
            filter_status: 's',
            sort: 'S',
            clear_filters: 'x',
            // Other
            open: 'o',
            copy_id: 'y',
            select_namespace: 'n',
            refresh: 'r',
            help: '?',
            quit: 'q',
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // One Dark color scheme
            border: "#5c6370".to_string(),
            border_active: "#61afef".to_string(),
            selected_bg: "#2c323c".to_string(),
            text: "#abb2bf".to_string(),
            text_muted: "#5c6370".to_string(),
            highlight: "#61afef".to_string(),
            status_passing: "#98c379".to_string(),  // Green
            status_warning: "#e5c07b".to_string(),  // Yellow
            status_critical: "#e06c75".to_string(), // Red
            status_unknown: "#c678dd".to_string(),  // Purple
        }
    }
}

impl Config {
    /// Search the usual locations, falling back to defaults
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    return config;
                }
                Err(e) => tracing::warn!("Skipping {}: {e:#}", path.display()),
            }
        }
        Config::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        // 1. XDG path (~/.config/lazysensu/config.toml), also common on macOS
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("lazysensu").join("config.toml"));
        }
        // 2. Platform-specific config dir (~/Library/Application Support/ on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("lazysensu").join("config.toml"));
        }
        // 3. ~/.lazysensu.toml
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".lazysensu.toml"));
        }
        paths
    }

    /// Startup namespace, if one is configured
    pub fn initial_namespace(&self) -> Result<Option<Namespace>, NamespaceError> {
        self.namespace
            .as_deref()
            .map(|s| s.parse::<Namespace>())
            .transpose()
    }
}

impl Theme {
    pub fn parse_color(&self, hex: &str) -> ratatui::style::Color {
        // Parse hex color string (e.g., "#61afef")
        if hex.starts_with('#') && hex.len() == 7 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[1..3], 16),
                u8::from_str_radix(&hex[3..5], 16),
                u8::from_str_radix(&hex[5..7], 16),
            ) {
                return ratatui::style::Color::Rgb(r, g, b);
            }
        }
        ratatui::style::Color::White
    }

    pub fn status_color(&self, status: Option<CheckStatus>) -> ratatui::style::Color {
        match status {
            Some(CheckStatus::Passing) => self.parse_color(&self.status_passing),
            Some(CheckStatus::Warning) => self.parse_color(&self.status_warning),
            Some(CheckStatus::Critical) => self.parse_color(&self.status_critical),
            Some(CheckStatus::Unknown) => self.parse_color(&self.status_unknown),
            None => self.parse_color(&self.text_muted),
        }
    }

    /// Dot color for an environment's colour id in the namespace menu
    pub fn environment_color(&self, colour_id: Option<&str>) -> ratatui::style::Color {
        use ratatui::style::Color;
        match colour_id {
            Some("BLUE") => Color::Rgb(97, 175, 239),
            Some("GRAY") => Color::Rgb(140, 140, 140),
            Some("GREEN") => Color::Rgb(152, 195, 121),
            Some("ORANGE") => Color::Rgb(209, 154, 102),
            Some("PINK") => Color::Rgb(230, 150, 200),
            Some("PURPLE") => Color::Rgb(198, 120, 221),
            Some("RED") => Color::Rgb(224, 108, 117),
            Some("YELLOW") => Color::Rgb(229, 192, 123),
            _ => self.parse_color(&self.text_muted),
        }
    }
}
