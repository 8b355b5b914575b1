//! Terminal client for the FactLens news bias analysis service.
//!
//! - `api` - HTTP client and wire types for the analysis service
//! - `collection` - Loaded article list with client-side filters
//! - `workflow` - Analysis and article detail request lifecycles
//! - `app` / `ui` - ratatui front end
//! - `config` - Optional TOML configuration
//! - `report` - Plain-text output for the one-shot modes

pub mod api;
pub mod app;
pub mod collection;
pub mod config;
pub mod report;
pub mod theme;
pub mod ui;
pub mod util;
pub mod workflow;
