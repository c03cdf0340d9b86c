use crate::config::ApiConfig;
use crate::filter::QueryParams;
use crate::namespace::Namespace;
use crate::sensu::types::*;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const VIEWER_QUERY: &str = r#"
query Viewer {
  viewer {
    organizations {
      name
      environments { name colourId }
    }
  }
}"#;

const ENVIRONMENT_QUERY: &str = r#"
query EnvironmentEvents($organization: String!, $environment: String!, $filter: String, $order: EventsListOrder) {
  environment(organization: $organization, environment: $environment) {
    checks(first: 1000) { edges { node { name } } }
    entities(first: 1000) { edges { node { name } } }
    events(first: 100, filter: $filter, orderBy: $order) {
      edges {
        node {
          id
          timestamp
          entity { name }
          check { name status output silenced history { status executed } }
        }
      }
      pageInfo { hasNextPage }
    }
  }
}"#;

const RESOLVE_EVENT_MUTATION: &str = r#"
mutation ResolveEvent($input: ResolveEventInput!) {
  resolveEvent(input: $input) {
    event { id }
  }
}"#;

/// GraphQL client for the Sensu API
pub struct SensuClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    pub timeout_secs: u64,
}

impl SensuClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lazysensu/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/graphql", config.url.trim_end_matches('/')),
            token: config.token.clone(),
            timeout_secs: 30,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Post a GraphQL document and unwrap the `data` member
    async fn exec<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .context("Sensu API request timed out")?
            .with_context(|| format!("Failed to reach Sensu API at {}", self.endpoint))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!("Sensu API rejected the credentials. Check api.token in config.toml");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sensu API returned {}: {}", status, body.trim());
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .context("Failed to parse Sensu API response")?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            anyhow::bail!("GraphQL error: {}", messages.join("; "));
        }

        body.data.context("Sensu API response had no data")
    }

    /// Organizations and environments visible to the current user
    pub async fn viewer(&self) -> Result<Viewer> {
        #[derive(Deserialize)]
        struct Data {
            viewer: Option<Viewer>,
        }

        let data: Data = self.exec(VIEWER_QUERY, json!({})).await?;
        tracing::debug!(
            organizations = data.viewer.as_ref().map(|v| v.organizations.len()).unwrap_or(0),
            "loaded viewer"
        );
        data.viewer.context("Not logged in: viewer is empty")
    }

    /// Checks, entities and the first page of events for a namespace
    pub async fn environment(
        &self,
        namespace: &Namespace,
        params: &QueryParams,
    ) -> Result<EnvironmentData> {
        #[derive(Deserialize)]
        struct Data {
            environment: Option<EnvironmentData>,
        }

        let variables = json!({
            "organization": namespace.organization,
            "environment": namespace.environment,
            "filter": params.filter,
            "order": params.order.as_str(),
        });

        let data: Data = self.exec(ENVIRONMENT_QUERY, variables).await?;
        let env = data
            .environment
            .with_context(|| format!("Environment {namespace} not found"))?;

        tracing::debug!(
            %namespace,
            filter = params.filter.as_deref().unwrap_or(""),
            order = params.order.as_str(),
            events = env.events.len(),
            "loaded environment"
        );
        Ok(env)
    }

    pub async fn resolve_event(&self, id: &str) -> Result<()> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "resolveEvent")]
            resolve_event: Option<serde_json::Value>,
        }

        let data: Data = self
            .exec(RESOLVE_EVENT_MUTATION, json!({ "input": { "id": id } }))
            .await?;

        if data.resolve_event.is_none() {
            anyhow::bail!("Event {id} was not resolved");
        }
        Ok(())
    }
}
