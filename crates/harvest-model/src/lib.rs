//! Core types shared by the harvester crates.
//!
//! - [`Code`]: a canonical upper-case candidate code
//! - [`FilterPolicy`]: length threshold and exclusion list used during extraction
//! - [`SubmissionRecord`]: one audited submission attempt

pub mod code;
pub mod policy;
pub mod record;

pub use code::{Code, CodeError};
pub use policy::{DEFAULT_EXCLUSIONS, FilterPolicy, MIN_CODE_LEN_EXCLUSIVE};
pub use record::{SubmissionRecord, TIMESTAMP_FORMAT};
