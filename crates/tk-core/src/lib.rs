//! tk-core: numeric foundation for tunekit.
//!
//! Contains:
//! - numeric (Real, step epsilon, slice predicates)
//! - stats (median, RMSE, first-crossing search over sampled series)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod stats;

pub use error::{TkError, TkResult};
pub use numeric::*;
pub use stats::*;
