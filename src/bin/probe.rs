//! Exercise the API client against a live backend without starting the TUI.
//! Run with: cargo run --bin probe [organization/environment]

use lazysensu::config::Config;
use lazysensu::filter::{self, FilterChoice, QueryParams, SortOrder};
use lazysensu::namespace::{self, Namespace};
use lazysensu::sensu::SensuClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== lazysensu API probe ===\n");

    let config = Config::load();
    println!("API: {}", config.api.url);
    println!(
        "Token: {}\n",
        if config.api.token.is_some() { "configured" } else { "none" }
    );

    let client = SensuClient::new(&config.api)?.with_timeout(config.settings.api_timeout);

    // Test 1: viewer
    println!("--- Test 1: viewer ---");
    let viewer = match client.viewer().await {
        Ok(viewer) => viewer,
        Err(e) => {
            println!("✗ Failed: {e:#}");
            std::process::exit(1);
        }
    };
    println!("✓ {} organizations", viewer.organizations.len());
    for org in &viewer.organizations {
        let envs: Vec<&str> = org.environments.iter().map(|e| e.name.as_str()).collect();
        println!("  {}: {}", org.name, envs.join(", "));
    }

    let requested = std::env::args().nth(1).map(|s| s.parse::<Namespace>()).transpose()?;
    let Some(ns) = requested
        .or(config.initial_namespace()?)
        .or_else(|| Namespace::first_available(&viewer.organizations))
    else {
        println!("\nNo environments visible, nothing more to probe");
        return Ok(());
    };

    // Test 2: namespace menu for the chosen organization
    println!("\n--- Test 2: namespace menu ({}) ---", ns.organization);
    match namespace::menu_rows(&viewer.organizations, &ns.organization) {
        Ok(rows) => {
            for row in rows {
                match row.namespace() {
                    Some(target) => println!(
                        "  {target}  ->  {}",
                        namespace::navigation_target(&target.organization, &target.environment)
                    ),
                    None => println!("  ────────"),
                }
            }
        }
        Err(e) => println!("✗ {e}"),
    }

    // Test 3: events, unfiltered
    println!("\n--- Test 3: environment {ns} ---");
    let mut params = QueryParams::default();
    match client.environment(&ns, &params).await {
        Ok(env) => {
            println!(
                "✓ {} checks, {} entities, {} events{}",
                env.checks.len(),
                env.entities.len(),
                env.events.len(),
                if env.events.page_info.has_next_page { " (more available)" } else { "" }
            );
            for event in env.events.nodes().take(10) {
                let status = event.status().map(|s| s.label()).unwrap_or("-");
                println!("  [{status:<8}] {} › {}", event.entity_name(), event.check_name());
            }
        }
        Err(e) => println!("✗ Failed: {e:#}"),
    }

    // Test 4: incidents, newest first
    println!("\n--- Test 4: incidents, newest first ---");
    for choice in [
        FilterChoice::Status(filter::StatusFilter::Predicate(filter::INCIDENT_PREDICATE.into())),
        FilterChoice::Sort(SortOrder::Newest),
    ] {
        params.apply(&choice.to_query_change())?;
    }
    println!("  filter={:?} order={}", params.filter, params.order);
    match client.environment(&ns, &params).await {
        Ok(env) => println!("✓ {} incidents", env.events.len()),
        Err(e) => println!("✗ Failed: {e:#}"),
    }

    println!("\nResolve is not probed: it changes backend state.");
    Ok(())
}
