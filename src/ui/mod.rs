//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling per view
//! - `events` - Background task result processing
//! - `helpers` - Background request spawning
//! - `render` - View rendering dispatch
//! - `articles` - Filter bar and article list
//! - `detail` - Article detail with its analysis
//! - `analyze` - Ad hoc text analysis screen
//! - `analysis_panel` - Gauges and findings shared by detail and analyze
//! - `status` - Status bar and spinner

mod analysis_panel;
mod analyze;
mod articles;
mod detail;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
