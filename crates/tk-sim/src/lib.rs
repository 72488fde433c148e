//! Closed-loop simulation of a PID controller around an FOPDT plant.
//!
//! Provides:
//! - Loop assembly `T = Gc Gp / (1 + Gc Gp)` with a low-order Padé delay
//! - Set-point step simulation on the experiment's time axis
//! - Step-response performance metrics (rise time, settling time, overshoot,
//!   steady-state error)

pub mod closed_loop;
pub mod error;
pub mod metrics;

pub use closed_loop::{ClosedLoopResponse, Plant, SimConfig, closed_loop_tf, simulate_closed_loop};
pub use error::{SimError, SimResult};
pub use metrics::PerformanceMetrics;
