//! rcat-runner: executes categorical tests through Rscript
//!
//! One call validates the request, exports the table to `data_<id>.csv`,
//! renders `categorical_script_<id>.R`, runs `Rscript --vanilla` on it in the
//! configured work directory and returns the console output as lines. Both
//! files are deleted before the call returns, whatever the outcome.
//!
//! # Example
//!
//! ```ignore
//! use rcat_core::{DataTable, VariableBindings};
//! use rcat_runner::run_test;
//! use std::path::Path;
//!
//! let table = DataTable::from_columns([
//!     ("before", vec!["Yes", "Yes", "No", "No"]),
//!     ("after", vec!["Yes", "No", "No", "Yes"]),
//! ])?;
//! let lines = run_test(
//!     &table,
//!     "mcnemar",
//!     &VariableBindings::paired("before", "after"),
//!     None,
//!     Path::new("Rscript"),
//! )?;
//! for line in lines {
//!     println!("{line}");
//! }
//! ```

pub mod artifacts;
pub mod decoder;
pub mod pipeline;
pub mod process;

pub use artifacts::ArtifactPair;
pub use decoder::decode_lines;
pub use pipeline::{run_test, Pipeline};
