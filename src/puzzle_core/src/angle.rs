use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::OnceLock,
};

use crate::{
    MathError,
    fixed::Fixed,
    trig::{self, TAU},
};

/// An angle in `[0, 2π)` with its sine and cosine computed at most once.
pub struct Angle {
    radians: Fixed,
    sin: OnceLock<Fixed>,
    cos: OnceLock<Fixed>,
}

impl Angle {
    /// Wrap a radian value that is already in range.
    ///
    /// # Errors
    ///
    /// Fails when `radians` compares outside `[0, 2π)`.
    pub fn new(radians: Fixed) -> Result<Angle, MathError> {
        if radians.cmp_zero() == Ordering::Less || radians >= *TAU {
            return Err(MathError::AngleOutOfRange(radians));
        }
        Ok(Angle::unchecked(radians))
    }

    /// Wrap an arbitrary radian value, reducing it modulo 2π first.
    #[must_use]
    pub fn reduced(radians: Fixed) -> Angle {
        Angle::unchecked(trig::mod_2pi(radians))
    }

    #[must_use]
    pub fn zero() -> Angle {
        Angle::unchecked(Fixed::zero())
    }

    fn unchecked(radians: Fixed) -> Angle {
        Angle {
            radians,
            sin: OnceLock::new(),
            cos: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn radians(&self) -> &Fixed {
        &self.radians
    }

    pub fn sin(&self) -> &Fixed {
        self.sin.get_or_init(|| trig::sin(&self.radians))
    }

    pub fn cos(&self) -> &Fixed {
        self.cos.get_or_init(|| trig::cos(&self.radians))
    }

    /// The angle rotating the opposite way, `2π − self`.
    #[must_use]
    pub fn inverse(&self) -> Angle {
        Angle::reduced(-self.radians.clone())
    }
}

impl Clone for Angle {
    fn clone(&self) -> Self {
        let clone = Angle::unchecked(self.radians.clone());
        if let Some(sin) = self.sin.get() {
            let _ = clone.sin.set(sin.clone());
        }
        if let Some(cos) = self.cos.get() {
            let _ = clone.cos.set(cos.clone());
        }
        clone
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.radians == other.radians
    }
}

impl Eq for Angle {}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.radians.hash(state);
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}rad", self.radians)
    }
}

#[cfg(test)]
mod tests {
    use super::Angle;
    use crate::{
        fixed::Fixed,
        trig::{FRAC_PI_2, TAU},
    };

    #[test]
    fn range_check() {
        assert!(Angle::new(Fixed::zero()).is_ok());
        assert!(Angle::new(FRAC_PI_2.clone()).is_ok());
        assert!(Angle::new(TAU.clone()).is_err());
        assert!(Angle::new(Fixed::from(-1)).is_err());
    }

    #[test]
    fn reduction() {
        assert_eq!(
            Angle::reduced(TAU.clone() + &*FRAC_PI_2),
            Angle::new(FRAC_PI_2.clone()).unwrap()
        );
        assert_eq!(Angle::reduced(-TAU.clone()), Angle::zero());
    }

    #[test]
    fn memoized_trig_matches() {
        let angle = Angle::new(FRAC_PI_2.clone()).unwrap();
        assert_eq!(angle.sin(), &Fixed::one());
        assert_eq!(angle.cos(), &Fixed::zero());
        // Second call returns the cached value.
        assert_eq!(angle.sin(), &Fixed::one());

        let copy = angle.clone();
        assert_eq!(copy.sin(), &Fixed::one());
    }

    #[test]
    fn inverse_cancels() {
        let angle = Angle::reduced(Fixed::from_ratio(5, 3));
        let back = Angle::reduced(angle.radians().clone() + angle.inverse().radians());
        assert_eq!(back, Angle::zero());
    }
}
