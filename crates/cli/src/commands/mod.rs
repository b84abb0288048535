//! Command implementations.

mod analyze;
mod batch;
mod classify;
mod info;
mod validate;

pub use analyze::run_analyze;
pub use batch::run_batch;
pub use classify::run_classify;
pub use info::run_info;
pub use validate::run_validate;
