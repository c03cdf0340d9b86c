//! Translation of filter menu choices into the backend's filter language.
//!
//! The strings built here are handed to the events query as its `filter`
//! or `orderBy` argument; nothing here talks to the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Built-in predicate behind the "Incident" status option
pub const INCIDENT_PREDICATE: &str = "HasCheck && IsIncident";

/// Check that every agent reports, offered even when no check config exists for it
pub const KEEPALIVE_CHECK: &str = "keepalive";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown sort order '{0}' (expected SEVERITY, NEWEST or OLDEST)")]
    UnknownSortOrder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    Passing,
    Warning,
    Critical,
    Unknown,
}

impl CheckStatus {
    pub const ALL: [CheckStatus; 4] = [
        CheckStatus::Passing,
        CheckStatus::Warning,
        CheckStatus::Critical,
        CheckStatus::Unknown,
    ];

    pub fn code(self) -> u32 {
        match self {
            CheckStatus::Passing => 0,
            CheckStatus::Warning => 1,
            CheckStatus::Critical => 2,
            CheckStatus::Unknown => 3,
        }
    }

    /// Exit codes above 3 are reported as unknown by the backend
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => CheckStatus::Passing,
            1 => CheckStatus::Warning,
            2 => CheckStatus::Critical,
            _ => CheckStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Passing => "Passing",
            CheckStatus::Warning => "Warning",
            CheckStatus::Critical => "Critical",
            CheckStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CheckStatus::Passing => "●",
            CheckStatus::Warning => "▲",
            CheckStatus::Critical => "✖",
            CheckStatus::Unknown => "?",
        }
    }
}

/// Status menu value: one code, several codes, or a raw predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Single(CheckStatus),
    Set(Vec<CheckStatus>),
    Predicate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    Severity,
    Newest,
    Oldest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Severity, SortOrder::Newest, SortOrder::Oldest];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Severity => "SEVERITY",
            SortOrder::Newest => "NEWEST",
            SortOrder::Oldest => "OLDEST",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Severity => "Severity",
            SortOrder::Newest => "Newest",
            SortOrder::Oldest => "Oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterError::UnknownSortOrder(s.to_string()))
    }
}

/// Which events query argument a change targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryParam {
    Filter,
    Order,
}

impl QueryParam {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryParam::Filter => "filter",
            QueryParam::Order => "order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryChange {
    pub param: QueryParam,
    pub value: String,
}

/// A single choice made in one of the filter menus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    Entity(String),
    Check(String),
    Status(StatusFilter),
    Raw(String),
    Sort(SortOrder),
}

impl FilterChoice {
    pub fn to_query_change(&self) -> QueryChange {
        let (param, value) = match self {
            FilterChoice::Entity(name) => (QueryParam::Filter, by_entity(name)),
            FilterChoice::Check(name) => (QueryParam::Filter, by_check(name)),
            FilterChoice::Status(status) => (QueryParam::Filter, by_status(status)),
            FilterChoice::Raw(expr) => (QueryParam::Filter, expr.trim().to_string()),
            FilterChoice::Sort(order) => (QueryParam::Order, by_sort(*order)),
        };
        QueryChange { param, value }
    }
}

pub fn by_entity(name: &str) -> String {
    format!("Entity.ID=='{}'", escape_literal(name))
}

pub fn by_check(name: &str) -> String {
    format!("Check.Name=='{}'", escape_literal(name))
}

pub fn by_status(status: &StatusFilter) -> String {
    match status {
        StatusFilter::Single(status) => format!("Check.Status=={}", status.code()),
        StatusFilter::Set(codes) if codes.len() == 1 => {
            format!("Check.Status=={}", codes[0].code())
        }
        StatusFilter::Set(codes) => {
            let joined = codes
                .iter()
                .map(|c| c.code().to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("Check.Status IN ({joined})")
        }
        StatusFilter::Predicate(expr) => expr.clone(),
    }
}

pub fn by_sort(order: SortOrder) -> String {
    order.as_str().to_string()
}

/// Escape a value for a single-quoted string literal in a filter expression
fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Entries of the status menu, in display order
pub fn status_options() -> Vec<(&'static str, Option<CheckStatus>, StatusFilter)> {
    let mut options = vec![(
        "Incident",
        None,
        StatusFilter::Predicate(INCIDENT_PREDICATE.to_string()),
    )];
    for status in [
        CheckStatus::Warning,
        CheckStatus::Critical,
        CheckStatus::Unknown,
        CheckStatus::Passing,
    ] {
        options.push((status.label(), Some(status), StatusFilter::Set(vec![status])));
    }
    options
}

/// Arguments re-sent with every events query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl QueryParams {
    /// Apply a `(param, value)` change; an empty filter value clears the filter
    pub fn apply(&mut self, change: &QueryChange) -> Result<(), FilterError> {
        match change.param {
            QueryParam::Filter => {
                self.filter = if change.value.is_empty() {
                    None
                } else {
                    Some(change.value.clone())
                };
            }
            QueryParam::Order => self.order = change.value.parse()?,
        }
        Ok(())
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_entity() {
        assert_eq!(by_entity("web-01"), "Entity.ID=='web-01'");
    }

    #[test]
    fn test_by_check() {
        assert_eq!(by_check("check-disk"), "Check.Name=='check-disk'");
    }

    #[test]
    fn test_names_are_escaped() {
        assert_eq!(by_entity("o'brien"), r"Entity.ID=='o\'brien'");
        assert_eq!(by_check(r"a\b"), r"Check.Name=='a\\b'");
    }

    #[test]
    fn test_by_status_single() {
        assert_eq!(by_status(&StatusFilter::Set(vec![CheckStatus::Critical])), "Check.Status==2");
        assert_eq!(by_status(&StatusFilter::Single(CheckStatus::Passing)), "Check.Status==0");
    }

    #[test]
    fn test_by_status_multiple() {
        let filter = StatusFilter::Set(vec![CheckStatus::Warning, CheckStatus::Critical]);
        assert_eq!(by_status(&filter), "Check.Status IN (1,2)");
    }

    #[test]
    fn test_by_status_predicate_passthrough() {
        let filter = StatusFilter::Predicate(INCIDENT_PREDICATE.to_string());
        assert_eq!(by_status(&filter), "HasCheck && IsIncident");
    }

    #[test]
    fn test_by_sort_passthrough() {
        assert_eq!(by_sort(SortOrder::Newest), "NEWEST");
        assert_eq!(SortOrder::Oldest.label(), "Oldest");
    }

    #[test]
    fn test_choice_targets_param() {
        let change = FilterChoice::Sort(SortOrder::Oldest).to_query_change();
        assert_eq!(change.param, QueryParam::Order);
        assert_eq!(change.value, "OLDEST");

        let change = FilterChoice::Entity("db".into()).to_query_change();
        assert_eq!(change.param, QueryParam::Filter);
        assert_eq!(change.param.as_str(), "filter");
    }

    #[test]
    fn test_status_options_order() {
        let labels: Vec<&str> = status_options().iter().map(|(label, _, _)| *label).collect();
        assert_eq!(labels, vec!["Incident", "Warning", "Critical", "Unknown", "Passing"]);
    }

    #[test]
    fn test_params_apply() {
        let mut params = QueryParams::default();
        params
            .apply(&FilterChoice::Check("keepalive".into()).to_query_change())
            .unwrap();
        params.apply(&FilterChoice::Sort(SortOrder::Newest).to_query_change()).unwrap();

        assert_eq!(params.filter.as_deref(), Some("Check.Name=='keepalive'"));
        assert_eq!(params.order, SortOrder::Newest);

        params.apply(&FilterChoice::Raw("  ".into()).to_query_change()).unwrap();
        assert!(!params.is_filtered());
    }

    #[test]
    fn test_params_reject_unknown_order() {
        let mut params = QueryParams::default();
        let err = params
            .apply(&QueryChange { param: QueryParam::Order, value: "RANDOM".into() })
            .unwrap_err();
        assert_eq!(err, FilterError::UnknownSortOrder("RANDOM".into()));
        assert_eq!(params.order, SortOrder::Severity);
    }

    #[test]
    fn test_status_from_code() {
        assert_eq!(CheckStatus::from_code(1), CheckStatus::Warning);
        assert_eq!(CheckStatus::from_code(127), CheckStatus::Unknown);
    }
}
