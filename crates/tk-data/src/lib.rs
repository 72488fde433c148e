//! Experimental step-response data for tunekit.
//!
//! Loading a dataset runs four stages:
//! 1. **Read** a container of named numeric arrays (MAT v5, MAT v7.3 via HDF5, CSV)
//! 2. **Match** the time/input/output arrays against an ordered alias schema
//! 3. **Clean** rows: common length, finite values, sorted and deduplicated time
//! 4. **Detect** the input step and derive `y0`, `du`, `dy` and the static gain `k`
//!
//! A [`Dataset`] is only ever returned fully populated.

pub mod clean;
pub mod dataset;
pub mod error;
pub mod reader;
pub mod schema;
pub mod step;

pub use clean::{Columns, clean_columns};
pub use dataset::{Dataset, load_dataset};
pub use error::{DataError, DataResult};
pub use reader::{ArrayContainer, FileFormat, parse_csv, read_container};
pub use schema::{Field, FieldAliases, ResolvedArrays, Schema};
pub use step::{StepDetectConfig, StepInfo, detect_step};
