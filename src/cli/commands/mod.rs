//! CLI command implementations.

mod align;
mod batch;
mod config;
mod score;

pub use align::run_align;
pub use batch::run_batch;
pub use config::run_config;
pub use score::run_score;
