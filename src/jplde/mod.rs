//! JPL DE export binary format layer
//!
//! This module reads the classic JPL Development Ephemeris export binary
//! format: a fixed header block (title lines, constant names, the covered
//! Julian date range and record step, the AU-in-km constant, the Earth/Moon
//! mass ratio and the per-series coefficient layout table), a second block
//! of constant values, then fixed-size data records of Chebyshev
//! coefficients.
//!
//! It exposes exactly the evaluation primitive the rest of the crate
//! builds on: open a dataset, then ask for the state of a target body
//! relative to a center body at a Julian date. Raw results are in the
//! dataset's native units scaled to AU and AU/day; unit conversion to
//! kilometers happens one layer up, in [`crate::ephemeris`].
//!
//! # Main Components
//!
//! - `header`: the fixed header block and its validation
//! - `dataset`: memory-mapped dataset access and state evaluation
//! - `chebyshev`: polynomial series evaluation and differentiation
//! - `ids`: the standard DE body-numbering convention
//! - `calendar`: Julian date <-> calendar conversions for tooling

pub mod calendar;
pub mod chebyshev;
pub mod dataset;
pub mod header;
pub mod ids;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(test)]
mod tests;

// Re-export primary types for convenience
pub use self::dataset::DeFile;
pub use self::header::DeHeader;
