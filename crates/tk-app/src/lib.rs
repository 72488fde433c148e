//! Shared application service layer for tunekit.
//!
//! Holds the mutable workbench state (dataset, identified model, current PID
//! parameters) in an explicit [`Session`] so that frontends drive the
//! pipeline without globals, and independent sessions can coexist.

pub mod config;
pub mod error;
pub mod session;

pub use config::SessionConfig;
pub use error::{AppError, AppResult};
pub use session::{PidOverride, Session};

pub use tk_controls::{PidParameters, TuningMethod};
pub use tk_data::{Dataset, StepInfo};
pub use tk_ident::{Candidate, FopdtModel, IdentMethod, Identification};
pub use tk_sim::{ClosedLoopResponse, PerformanceMetrics};
