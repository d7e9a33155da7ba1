use std::{cmp::Ordering, sync::LazyLock};

use crate::{MathError, fixed::Fixed};

/// π to well past the compute scale; the parser rounds half-even.
const PI_DIGITS: &str =
    "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899";

/// π/2 to the same length.
const FRAC_PI_2_DIGITS: &str =
    "1.57079632679489661923132169163975144209858469968755291048747229615390820314310449";

pub static PI: LazyLock<Fixed> = LazyLock::new(|| {
    PI_DIGITS
        .parse()
        .unwrap_or_else(|_| unreachable!("constant digits parse"))
});

pub static FRAC_PI_2: LazyLock<Fixed> = LazyLock::new(|| {
    FRAC_PI_2_DIGITS
        .parse()
        .unwrap_or_else(|_| unreachable!("constant digits parse"))
});

pub static FRAC_3PI_2: LazyLock<Fixed> = LazyLock::new(|| PI.clone() + &*FRAC_PI_2);

pub static TAU: LazyLock<Fixed> = LazyLock::new(|| PI.clone() + &*PI);

/// Reduce `x` into `[0, 2π)` under compare semantics.
///
/// This is a loop rather than a division because a value may compare equal to
/// 2π while its exact mantissa is still below it; the loop keeps stepping by
/// exactly 2π until the comparison lands in range. A residue that still
/// compares below zero afterwards is within the rounding window of zero and
/// collapses to it.
#[must_use]
pub fn mod_2pi(mut x: Fixed) -> Fixed {
    while x.cmp_zero() == Ordering::Less {
        x += &*TAU;
    }
    while x >= *TAU {
        x -= &*TAU;
    }
    if x.cmp_zero() == Ordering::Less {
        Fixed::zero()
    } else {
        x
    }
}

/// Sine by the Maclaurin series on an argument reduced to `[−π, π]`.
#[must_use]
pub fn sin(x: &Fixed) -> Fixed {
    let mut y = mod_2pi(x.clone());
    if y > *PI {
        y -= &*TAU;
    }
    let y_squared = y.clone() * &y;
    let mut term = y.clone();
    let mut acc = y;
    let mut k: i64 = 1;
    loop {
        term = -(term * &y_squared) / &Fixed::from(2 * k * (2 * k + 1));
        if term.is_exactly_zero() {
            break;
        }
        acc += &term;
        k += 1;
    }
    acc
}

#[must_use]
pub fn cos(x: &Fixed) -> Fixed {
    sin(&(x.clone() + &*FRAC_PI_2))
}

/// Arcsine in `[−π/2, π/2]`. Inputs beyond `[−1, 1]` clamp to the endpoints.
#[must_use]
pub fn asin(x: &Fixed) -> Fixed {
    if x.cmp_zero() == Ordering::Less {
        return -asin(&-x.clone());
    }
    if *x > Fixed::one() {
        return FRAC_PI_2.clone();
    }
    if *x <= Fixed::from_ratio(1, 2) {
        asin_maclaurin(x)
    } else {
        asin_puiseux(x)
    }
}

/// Σ (2k)! / (4^k (k!)² (2k+1)) · x^(2k+1), valid and fast for |x| ≤ ½.
fn asin_maclaurin(x: &Fixed) -> Fixed {
    let x_squared = x.clone() * x;
    let mut term = x.clone();
    let mut acc = x.clone();
    let mut k: i64 = 0;
    loop {
        let odd = 2 * k + 1;
        term =
            term * &x_squared * &Fixed::from(odd * odd) / &Fixed::from((2 * k + 2) * (2 * k + 3));
        if term.is_exactly_zero() {
            break;
        }
        acc += &term;
        k += 1;
    }
    acc
}

/// asin(x) = π/2 − acos(x) with acos expanded at 1:
/// acos(1−ε) = √(2ε) · Σ (2k)! / (4^k (k!)² (2k+1) 2^k) · ε^k.
fn asin_puiseux(x: &Fixed) -> Fixed {
    let eps = Fixed::one() - x;
    let scale = (eps.clone() + &eps).sqrt();
    let mut term = Fixed::one();
    let mut acc = Fixed::one();
    let mut k: i64 = 0;
    loop {
        let odd = 2 * k + 1;
        term =
            term * &eps * &Fixed::from(odd * odd) / &Fixed::from(2 * (2 * k + 2) * (2 * k + 3));
        if term.is_exactly_zero() {
            break;
        }
        acc += &term;
        k += 1;
    }
    FRAC_PI_2.clone() - &(scale * &acc)
}

/// Arccosine in `[0, π]`. Inputs beyond `[−1, 1]` clamp to the endpoints.
#[must_use]
pub fn acos(x: &Fixed) -> Fixed {
    FRAC_PI_2.clone() - &asin(x)
}

#[must_use]
pub fn atan(x: &Fixed) -> Fixed {
    let denom = (Fixed::one() + &(x.clone() * x)).sqrt();
    asin(&(x.clone() / &denom))
}

/// The direction of the vector `(x, y)` as an angle in `[0, 2π)`.
///
/// # Errors
///
/// Fails when both components compare equal to zero; the direction of the
/// null vector is undefined.
pub fn atan2_mod_2pi(y: &Fixed, x: &Fixed) -> Result<Fixed, MathError> {
    match (x.cmp_zero(), y.cmp_zero()) {
        (Ordering::Equal, Ordering::Equal) => Err(MathError::Atan2Undefined),
        (Ordering::Equal, Ordering::Greater) => Ok(FRAC_PI_2.clone()),
        (Ordering::Equal, Ordering::Less) => Ok(FRAC_3PI_2.clone()),
        (Ordering::Greater, _) => Ok(mod_2pi(atan(&(y.clone() / x)))),
        (Ordering::Less, _) => Ok(atan(&(y.clone() / x)) + &*PI),
    }
}

#[cfg(test)]
mod tests {
    use super::{FRAC_3PI_2, FRAC_PI_2, PI, TAU, acos, asin, atan, atan2_mod_2pi, cos, mod_2pi, sin};
    use crate::fixed::Fixed;

    #[test]
    fn constants_relate() {
        assert_eq!(FRAC_PI_2.clone() + &*FRAC_PI_2, PI.clone());
        assert_eq!(PI.clone() + &*PI, TAU.clone());
        assert_eq!(PI.clone() + &*FRAC_PI_2, FRAC_3PI_2.clone());
    }

    #[test]
    fn mod_2pi_range() {
        for value in [-10, -3, 0, 3, 10, 40] {
            let reduced = mod_2pi(Fixed::from(value));
            assert!(reduced.cmp_zero() != std::cmp::Ordering::Less);
            assert!(reduced < *TAU);
        }
        assert_eq!(mod_2pi(TAU.clone()), Fixed::zero());
        assert_eq!(mod_2pi(-FRAC_PI_2.clone()), FRAC_3PI_2.clone());
    }

    fn frac_pi_6() -> Fixed {
        PI.clone() / &Fixed::from(6)
    }

    #[test]
    fn sine_landmarks() {
        assert_eq!(sin(&Fixed::zero()), Fixed::zero());
        assert_eq!(sin(&FRAC_PI_2), Fixed::one());
        assert_eq!(sin(&PI), Fixed::zero());
        assert_eq!(sin(&frac_pi_6()), Fixed::from_ratio(1, 2));
    }

    #[test]
    fn cosine_landmarks() {
        assert_eq!(cos(&Fixed::zero()), Fixed::one());
        assert_eq!(cos(&PI), Fixed::from(-1));
        assert_eq!(cos(&(PI.clone() / &Fixed::from(3))), Fixed::from_ratio(1, 2));
    }

    #[test]
    fn pythagorean_identity() {
        let x = Fixed::from_ratio(7, 5);
        let s = sin(&x);
        let c = cos(&x);
        assert_eq!(s.clone() * &s + &(c.clone() * &c), Fixed::one());
    }

    #[test]
    fn arcsine_roundtrip() {
        for (n, d) in [(1, 2), (-1, 2), (9, 10), (1, 100), (99, 100)] {
            let x = Fixed::from_ratio(n, d);
            assert_eq!(sin(&asin(&x)), x);
        }
        assert_eq!(asin(&Fixed::one()), FRAC_PI_2.clone());
        assert_eq!(asin(&Fixed::from(2)), FRAC_PI_2.clone());
        assert_eq!(acos(&Fixed::from(-2)), PI.clone());
    }

    #[test]
    fn arctangent() {
        assert_eq!(atan(&Fixed::one()), PI.clone() / &Fixed::from(4));
        assert_eq!(atan(&Fixed::zero()), Fixed::zero());
    }

    #[test]
    fn atan2_quadrants() {
        assert_eq!(
            atan2_mod_2pi(&Fixed::zero(), &Fixed::one()).unwrap(),
            Fixed::zero()
        );
        assert_eq!(
            atan2_mod_2pi(&Fixed::one(), &Fixed::zero()).unwrap(),
            FRAC_PI_2.clone()
        );
        assert_eq!(
            atan2_mod_2pi(&Fixed::zero(), &Fixed::from(-1)).unwrap(),
            PI.clone()
        );
        assert_eq!(
            atan2_mod_2pi(&Fixed::from(-1), &Fixed::zero()).unwrap(),
            FRAC_3PI_2.clone()
        );
        assert_eq!(
            atan2_mod_2pi(&Fixed::one(), &Fixed::one()).unwrap(),
            PI.clone() / &Fixed::from(4)
        );
        assert!(atan2_mod_2pi(&Fixed::zero(), &Fixed::zero()).is_err());
    }
}
