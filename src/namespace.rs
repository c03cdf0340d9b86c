use crate::sensu::Organization;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("organization '{0}' is not visible to the current user")]
    OrganizationNotFound(String),
    #[error("invalid namespace '{0}', expected <organization>/<environment>")]
    Malformed(String),
}

/// Dashboard scope: an organization and one of its environments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub organization: String,
    pub environment: String,
}

impl Namespace {
    pub fn new(organization: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            environment: environment.into(),
        }
    }

    /// First environment of the first organization that has one
    pub fn first_available(organizations: &[Organization]) -> Option<Self> {
        organizations.iter().find_map(|org| {
            org.environments
                .first()
                .map(|env| Namespace::new(&org.name, &env.name))
        })
    }

    pub fn path(&self) -> String {
        navigation_target(&self.organization, &self.environment)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.environment)
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('/').split_once('/') {
            Some((org, env)) if !org.is_empty() && !env.is_empty() && !env.contains('/') => {
                Ok(Namespace::new(org, env))
            }
            _ => Err(NamespaceError::Malformed(s.to_string())),
        }
    }
}

/// Split `organizations` into the one named `current` and the rest, with
/// the rest in their given order.
pub fn partition<'a>(
    organizations: &'a [Organization],
    current: &str,
) -> Result<(&'a Organization, Vec<&'a Organization>), NamespaceError> {
    let (matching, others): (Vec<&Organization>, Vec<&Organization>) =
        organizations.iter().partition(|org| org.name == current);

    let current_org = matching
        .first()
        .copied()
        .ok_or_else(|| NamespaceError::OrganizationNotFound(current.to_string()))?;

    Ok((current_org, others))
}

/// Dashboard path for a namespace, e.g. `/acme/production/`
pub fn navigation_target(organization: &str, environment: &str) -> String {
    format!(
        "/{}/{}/",
        urlencoding::encode(organization),
        urlencoding::encode(environment)
    )
}

/// A line of the namespace switcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Environment {
        namespace: Namespace,
        colour_id: Option<String>,
        /// Belongs to the organization currently in view
        current_org: bool,
    },
    Separator,
}

impl MenuRow {
    pub fn namespace(&self) -> Option<&Namespace> {
        match self {
            MenuRow::Environment { namespace, .. } => Some(namespace),
            MenuRow::Separator => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, MenuRow::Environment { .. })
    }
}

/// Rows of the namespace switcher: the current organization's environments,
/// then every other organization's environments, with a separator between
/// groups and none after the last one.
pub fn menu_rows(
    organizations: &[Organization],
    current: &str,
) -> Result<Vec<MenuRow>, NamespaceError> {
    let (current_org, others) = partition(organizations, current)?;

    let env_rows = |org: &Organization, current_org: bool| {
        org.environments
            .iter()
            .map(|env| MenuRow::Environment {
                namespace: Namespace::new(&org.name, &env.name),
                colour_id: env.colour_id.clone(),
                current_org,
            })
            .collect::<Vec<_>>()
    };

    let mut rows = env_rows(current_org, true);
    for org in others {
        rows.push(MenuRow::Separator);
        rows.extend(env_rows(org, false));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensu::Environment;

    fn make_org(name: &str, envs: &[&str]) -> Organization {
        Organization {
            name: name.to_string(),
            environments: envs
                .iter()
                .map(|e| Environment { name: e.to_string(), colour_id: None })
                .collect(),
        }
    }

    #[test]
    fn test_partition_current_and_others() {
        let orgs = vec![make_org("a", &["dev"]), make_org("b", &["prod"])];
        let (current, others) = partition(&orgs, "b").unwrap();

        assert_eq!(current.name, "b");
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "a");
    }

    #[test]
    fn test_partition_keeps_order() {
        let orgs = vec![
            make_org("z", &[]),
            make_org("m", &[]),
            make_org("a", &[]),
            make_org("q", &[]),
        ];
        let (_, others) = partition(&orgs, "a").unwrap();
        let names: Vec<&str> = others.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["z", "m", "q"]);
    }

    #[test]
    fn test_partition_missing_org_is_error() {
        let orgs = vec![make_org("a", &["dev"])];
        let err = partition(&orgs, "nope").unwrap_err();
        assert_eq!(err, NamespaceError::OrganizationNotFound("nope".into()));
    }

    #[test]
    fn test_navigation_target() {
        assert_eq!(navigation_target("acme", "production"), "/acme/production/");
        assert_eq!(navigation_target("a b", "dev"), "/a%20b/dev/");
    }

    #[test]
    fn test_menu_rows_separators() {
        let orgs = vec![
            make_org("a", &["dev", "prod"]),
            make_org("b", &["default"]),
            make_org("c", &["x", "y"]),
        ];
        let rows = menu_rows(&orgs, "b").unwrap();

        let rendered: Vec<String> = rows
            .iter()
            .map(|row| match row {
                MenuRow::Environment { namespace, current_org, .. } => {
                    format!("{}{}", if *current_org { "*" } else { "" }, namespace)
                }
                MenuRow::Separator => "--".to_string(),
            })
            .collect();

        assert_eq!(
            rendered,
            vec!["*b/default", "--", "a/dev", "a/prod", "--", "c/x", "c/y"]
        );
    }

    #[test]
    fn test_menu_rows_single_org_has_no_separator() {
        let orgs = vec![make_org("a", &["dev"])];
        let rows = menu_rows(&orgs, "a").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(MenuRow::is_selectable));
    }

    #[test]
    fn test_namespace_parse() {
        let ns: Namespace = "acme/prod".parse().unwrap();
        assert_eq!(ns, Namespace::new("acme", "prod"));
        assert_eq!(ns.to_string(), "acme/prod");
        assert_eq!("/acme/prod/".parse::<Namespace>().unwrap(), ns);

        assert!("acme".parse::<Namespace>().is_err());
        assert!("acme/".parse::<Namespace>().is_err());
        assert!("a/b/c".parse::<Namespace>().is_err());
    }

    #[test]
    fn test_first_available() {
        let orgs = vec![make_org("empty", &[]), make_org("acme", &["prod", "dev"])];
        assert_eq!(Namespace::first_available(&orgs), Some(Namespace::new("acme", "prod")));
        assert_eq!(Namespace::first_available(&[]), None);
    }
}
