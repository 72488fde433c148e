//! Linear time-invariant building blocks for tunekit.
//!
//! This crate holds just enough transfer-function machinery for the
//! identification and closed-loop pipelines:
//!
//! - **Polynomials** with coefficients stored highest power first
//! - **Transfer functions** with series and unity-feedback combination
//! - **Padé approximation** of a pure transport delay
//! - **State-space realization** and exact zero-order-hold propagation
//! - **Unit-step response** sampled on arbitrary, possibly non-uniform, time grids

pub mod error;
pub mod pade;
pub mod poly;
pub mod response;
pub mod state_space;
pub mod transfer_function;

pub use error::{LtiError, LtiResult};
pub use pade::pade;
pub use poly::Polynomial;
pub use response::{fopdt_step, step_response};
pub use state_space::StateSpace;
pub use transfer_function::TransferFunction;
