//! Terminal User Interface module.
//!
//! - `loop_runner` - main event loop, tick handling and terminal management
//! - `input` - keyboard input for browse, search and location picker modes
//! - `events` - applies background task results
//! - `helpers` - task spawning and panic capture
//! - `render` - layout and overlay dispatch
//! - `categories`, `items`, `pager`, `status`, `location`, `help` - widgets

mod categories;
mod events;
mod help;
mod helpers;
mod input;
mod items;
mod location;
mod loop_runner;
mod pager;
mod render;
mod status;

pub use loop_runner::{run, Action};
