//! amps-core: stable foundation for the AMPS parameter tools.
//!
//! Contains:
//! - units (uom SI types + constructors for space-physics units)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{AmpsError, AmpsResult};
pub use numeric::*;
pub use units::*;
