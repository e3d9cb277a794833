//! hp-core: numeric foundation for the heat-pump thermal kernel.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float checks)
//! - linalg (fixed-size 2x2 / 2x1 algebra)
//! - ids (compact arena IDs + string asset identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod linalg;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use linalg::{Mat2, Vec2};
pub use numeric::*;
pub use units::*;
