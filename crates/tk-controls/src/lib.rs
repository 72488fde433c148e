//! PID controller parameters and classical FOPDT tuning rules.
//!
//! - **PID parameters** in the ideal parallel form `Kp (1 + 1/(Ti s) + Td s)`
//! - **Tuning rules**: Ziegler-Nichols open loop, IMC, CHR (with and without
//!   overshoot), ITAE and Cohen-Coon, all evaluated from `(k, tau, theta)`
//!
//! Tuning never fails: an invalid plant model yields zero gains and formulas
//! that divide by a zero dead time yield non-finite values, which callers
//! detect with [`PidParameters::validate`].

pub mod error;
pub mod pid;
pub mod tuning;

pub use error::{ControlError, ControlResult};
pub use pid::PidParameters;
pub use tuning::{ITAE_CONSTANTS, TuningMethod, tune};
