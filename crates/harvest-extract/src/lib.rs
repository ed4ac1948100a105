//! Code extraction for the harvester.
//!
//! Raw posts go through three steps:
//!
//! 1. [`select_announcements`] keeps only posts that announce codes
//!    (they contain "CODES ARE", case-insensitively) and normalizes them.
//! 2. [`normalize`] strips hashtags and collapses whitespace noise.
//! 3. [`extract`] splits the normalized text into words and keeps the ones
//!    the [`FilterPolicy`](harvest_model::FilterPolicy) admits.
//!
//! [`collect_codes`] chains all of it and reports the empty cases as
//! [`ExtractError`].

pub mod error;
pub mod extract;
pub mod normalize;

pub use error::{ExtractError, Result};
pub use extract::{ANNOUNCEMENT_MARKER, collect_codes, extract, is_announcement, select_announcements};
pub use normalize::normalize;
