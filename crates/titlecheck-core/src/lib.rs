//! Titlecheck Core - Shared infrastructure for the title audit tools
//!
//! Logging setup and terminal progress reporting used by both the
//! pipeline crate and the CLI.

pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
