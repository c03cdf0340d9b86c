use crate::filter::QueryParams;
use crate::namespace::Namespace;
use crate::sensu::{EnvironmentData, Organization};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last known state of one namespace, for instant startup
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: u64,
    pub organizations: Vec<Organization>,
    pub environment: EnvironmentData,
    #[serde(default)]
    pub params: QueryParams,
}

impl CacheEntry {
    pub fn new(
        organizations: Vec<Organization>,
        environment: EnvironmentData,
        params: QueryParams,
    ) -> Self {
        Self {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            organizations,
            environment,
            params,
        }
    }

    pub fn age_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().saturating_sub(self.timestamp))
            .unwrap_or(0)
    }
}

pub fn cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("lazysensu"))
}

/// `<org>+<env>.json` with both segments percent-encoded, so `+` and `/`
/// never appear inside a segment
fn cache_file(dir: &Path, namespace: &Namespace) -> PathBuf {
    dir.join(format!(
        "{}+{}.json",
        urlencoding::encode(&namespace.organization),
        urlencoding::encode(&namespace.environment)
    ))
}

pub fn load(namespace: &Namespace) -> Option<CacheEntry> {
    load_from(&cache_dir()?, namespace)
}

pub fn save(namespace: &Namespace, entry: &CacheEntry) -> Result<()> {
    let dir = cache_dir().ok_or_else(|| anyhow::anyhow!("No cache directory"))?;
    save_to(&dir, namespace, entry)
}

pub fn load_from(dir: &Path, namespace: &Namespace) -> Option<CacheEntry> {
    let path = cache_file(dir, namespace);
    let contents = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::debug!(path = %path.display(), "ignoring unreadable cache: {e}");
            None
        }
    }
}

pub fn save_to(dir: &Path, namespace: &Namespace, entry: &CacheEntry) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let contents = serde_json::to_string_pretty(entry)?;
    std::fs::write(cache_file(dir, namespace), contents)?;
    Ok(())
}
