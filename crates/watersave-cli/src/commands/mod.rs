//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `session` - Interactive session loop and line parsing
//! - `bill` - One-shot bill estimate
//! - `prompts` - Prompt library management commands
//! - `check` - Configuration and advice service check
//! - `render` - Text rendering shared by the commands

pub mod bill;
pub mod check;
pub mod prompts;
pub mod render;
pub mod session;

// Re-export command functions for main.rs
pub use bill::*;
pub use check::*;
pub use prompts::*;
pub use session::*;
