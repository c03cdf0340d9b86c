use crate::filter::{CheckStatus, KEEPALIVE_CHECK};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Relay-style connection: a page of `edges[].node` plus pagination info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedNode {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub entity: Option<NamedNode>,
    #[serde(default)]
    pub check: Option<CheckResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: u32,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub silenced: Vec<String>,
    #[serde(default)]
    pub history: Vec<CheckHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckHistory {
    pub status: u32,
    #[serde(default)]
    pub executed: i64,
}

impl Event {
    pub fn status(&self) -> Option<CheckStatus> {
        self.check.as_ref().map(|c| CheckStatus::from_code(c.status))
    }

    pub fn entity_name(&self) -> &str {
        self.entity.as_ref().map(|e| e.name.as_str()).unwrap_or("-")
    }

    pub fn check_name(&self) -> &str {
        self.check.as_ref().map(|c| c.name.as_str()).unwrap_or("-")
    }

    /// Any non-zero check status
    pub fn is_incident(&self) -> bool {
        self.check.as_ref().is_some_and(|c| c.status != 0)
    }

    pub fn is_silenced(&self) -> bool {
        self.check.as_ref().is_some_and(|c| !c.silenced.is_empty())
    }

    /// Passing now, failing on the most recent history entry
    pub fn is_resolution(&self) -> bool {
        let Some(check) = &self.check else {
            return false;
        };
        let previous_failed = check.history.last().is_some_and(|h| h.status != 0);
        previous_failed && !self.is_incident()
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// "5m ago" style age relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let Some(ts) = self.timestamp_utc() else {
            return "-".to_string();
        };
        let secs = (now - ts).num_seconds().max(0);
        match secs {
            0..=59 => format!("{secs}s ago"),
            60..=3599 => format!("{}m ago", secs / 60),
            3600..=86_399 => format!("{}h ago", secs / 3600),
            _ => format!("{}d ago", secs / 86_400),
        }
    }
}

/// Everything the events panel needs for one environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentData {
    #[serde(default)]
    pub checks: Connection<NamedNode>,
    #[serde(default)]
    pub entities: Connection<NamedNode>,
    #[serde(default)]
    pub events: Connection<Event>,
}

impl EnvironmentData {
    pub fn event_ids(&self) -> Vec<&str> {
        self.events.nodes().map(|e| e.id.as_str()).collect()
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.entities.nodes().map(|n| n.name.clone()).collect()
    }

    /// Configured checks followed by `keepalive`
    pub fn check_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checks.nodes().map(|n| n.name.clone()).collect();
        names.push(KEEPALIVE_CHECK.to_string());
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(rename = "colourId", default)]
    pub colour_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Viewer {
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(status: u32, history: &[u32]) -> Event {
        Event {
            id: "ev".to_string(),
            timestamp: Some(1_700_000_000),
            entity: Some(NamedNode { name: "web-01".into() }),
            check: Some(CheckResult {
                name: "check-http".into(),
                status,
                output: String::new(),
                silenced: vec![],
                history: history
                    .iter()
                    .map(|s| CheckHistory { status: *s, executed: 0 })
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_is_incident() {
        assert!(!make_event(0, &[]).is_incident());
        assert!(make_event(1, &[]).is_incident());
    }

    #[test]
    fn test_is_resolution() {
        assert!(!make_event(0, &[0]).is_resolution(), "No failing history");
        assert!(!make_event(0, &[1, 0]).is_resolution(), "Has not transitioned");
        assert!(make_event(0, &[0, 1]).is_resolution(), "Just transitioned");
        assert!(!make_event(1, &[0, 2]).is_resolution(), "Still an incident");
    }

    #[test]
    fn test_is_silenced() {
        let mut event = make_event(2, &[]);
        assert!(!event.is_silenced());
        if let Some(check) = event.check.as_mut() {
            check.silenced = vec!["entity:web-01:*".into()];
        }
        assert!(event.is_silenced());
    }

    #[test]
    fn test_event_without_check() {
        let event = Event { id: "x".into(), timestamp: None, entity: None, check: None };
        assert!(!event.is_incident());
        assert!(!event.is_resolution());
        assert_eq!(event.status(), None);
        assert_eq!(event.check_name(), "-");
        assert_eq!(event.age(Utc::now()), "-");
    }

    #[test]
    fn test_age() {
        let event = make_event(0, &[]);
        let now = Utc.timestamp_opt(1_700_000_000 + 125, 0).unwrap();
        assert_eq!(event.age(now), "2m ago");
    }

    #[test]
    fn test_deserialize_connection_without_edges() {
        let json = r#"{
            "checks": { "pageInfo": { "hasNextPage": false } },
            "events": {}
        }"#;
        let env: EnvironmentData = serde_json::from_str(json).unwrap();
        assert!(env.checks.is_empty());
        assert!(env.entities.is_empty());
        assert!(env.events.is_empty());
        assert!(!env.events.page_info.has_next_page);
        assert_eq!(env.check_names(), vec!["keepalive"]);
    }

    #[test]
    fn test_deserialize_environment() {
        let json = r#"{
            "checks": { "edges": [{ "node": { "name": "check-cpu" } }] },
            "entities": { "edges": [{ "node": { "name": "web-01" } }] },
            "events": {
                "edges": [{ "node": {
                    "id": "RXZlbnQ6MQ==",
                    "timestamp": 1700000000,
                    "entity": { "name": "web-01" },
                    "check": { "name": "check-cpu", "status": 2, "output": "CPU 99%" }
                } }],
                "pageInfo": { "hasNextPage": true }
            }
        }"#;
        let env: EnvironmentData = serde_json::from_str(json).unwrap();

        assert_eq!(env.event_ids(), vec!["RXZlbnQ6MQ=="]);
        assert_eq!(env.check_names(), vec!["check-cpu", "keepalive"]);
        assert_eq!(env.entity_names(), vec!["web-01"]);
        assert!(env.events.page_info.has_next_page);
        assert_eq!(env.events.nodes().next().and_then(|e| e.status()), Some(CheckStatus::Critical));
    }
}
