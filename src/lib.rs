pub mod app;
pub mod cache;
pub mod config;
pub mod events;
pub mod filter;
pub mod logging;
pub mod namespace;
pub mod resolve;
pub mod selection;
pub mod sensu;
pub mod ui;
