use std::fmt;

use puzzle_core::{Angle, Fixed, trig::TAU};

use crate::{PuzzleError, geometry::Geometry};

/// An atomic rotation: `2π / increment` counterclockwise on the interior of
/// `disk`.
pub struct Move<G: Geometry> {
    disk: G::Disk,
    increment: u32,
    angle: Angle,
    nonzero_angles: Vec<Angle>,
}

impl<G: Geometry> Move<G> {
    /// # Errors
    ///
    /// Fails when `increment` is below 2; a 1-fold turn moves nothing.
    pub fn new(disk: G::Disk, increment: u32) -> Result<Move<G>, PuzzleError> {
        if increment < 2 {
            return Err(PuzzleError::InvalidIncrement(increment));
        }
        let angle = Angle::reduced(TAU.clone() / &Fixed::from(increment));
        let nonzero_angles = (1..increment)
            .map(|k| Angle::reduced(angle.radians().clone() * &Fixed::from(k)))
            .collect();
        Ok(Move {
            disk,
            increment,
            angle,
            nonzero_angles,
        })
    }

    #[must_use]
    pub fn disk(&self) -> &G::Disk {
        &self.disk
    }

    #[must_use]
    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// The basic turn, `2π / increment`.
    #[must_use]
    pub fn angle(&self) -> &Angle {
        &self.angle
    }

    /// Every nontrivial multiple of the basic turn, `k·2π/increment` for
    /// `k ∈ [1, increment)`, with memoized trigonometry.
    #[must_use]
    pub fn nonzero_angles(&self) -> &[Angle] {
        &self.nonzero_angles
    }
}

impl<G: Geometry> Clone for Move<G> {
    fn clone(&self) -> Self {
        Move {
            disk: self.disk.clone(),
            increment: self.increment,
            angle: self.angle.clone(),
            nonzero_angles: self.nonzero_angles.clone(),
        }
    }
}

impl<G: Geometry> PartialEq for Move<G> {
    fn eq(&self, other: &Self) -> bool {
        self.disk == other.disk && self.increment == other.increment
    }
}

impl<G: Geometry> Eq for Move<G> {}

impl<G: Geometry> fmt::Debug for Move<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("disk", &self.disk)
            .field("increment", &self.increment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::{Fixed, trig::TAU};

    use super::Move;
    use crate::{
        PuzzleError,
        planar::{Circle, Planar, Point},
    };

    fn disk() -> Circle {
        Circle::new(Point::new(Fixed::zero(), Fixed::zero()), Fixed::one())
    }

    #[test]
    fn increments_below_two_are_rejected() {
        assert!(matches!(
            Move::<Planar>::new(disk(), 0),
            Err(PuzzleError::InvalidIncrement(0))
        ));
        assert!(matches!(
            Move::<Planar>::new(disk(), 1),
            Err(PuzzleError::InvalidIncrement(1))
        ));
        assert!(Move::<Planar>::new(disk(), 2).is_ok());
    }

    #[test]
    fn derived_angles() {
        let turn = Move::<Planar>::new(disk(), 4).unwrap();
        assert_eq!(turn.nonzero_angles().len(), 3);
        assert_eq!(
            turn.angle().radians().clone() * &Fixed::from(4),
            TAU.clone()
        );
        assert_eq!(
            turn.nonzero_angles()[1].radians().clone(),
            TAU.clone() / &Fixed::from(2)
        );
    }

    #[test]
    fn equality_ignores_derived_fields() {
        let a = Move::<Planar>::new(disk(), 3).unwrap();
        let b = Move::<Planar>::new(disk(), 3).unwrap();
        let c = Move::<Planar>::new(disk(), 4).unwrap();
        assert_eq!(a, b);
        assert!(a != c);
    }
}
