//! Exact-comparison arithmetic and the circle set algebra underlying the
//! circle-puzzle engines.
//!
//! The scalar type [`Fixed`] carries 40 fractional decimal digits and
//! compares through a randomized rounding bucket, so values that agree to 20
//! digits are interchangeable as hash keys. Everything else builds on that:
//! angles with memoized trigonometry, closed arc sets on the unit circle,
//! and the permutation type the puzzle engines emit.

use thiserror::Error;

pub mod angle;
pub mod fixed;
pub mod permutation;
pub mod trig;
pub mod unit_arcs;

pub use angle::Angle;
pub use fixed::Fixed;
pub use permutation::Permutation;
pub use unit_arcs::UnitArcs;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("atan2 is undefined at the origin")]
    Atan2Undefined,
    #[error("angle {0} lies outside [0, 2π)")]
    AngleOutOfRange(Fixed),
}
