use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::Sum,
    mem,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
    sync::LazyLock,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use thiserror::Error;

/// Number of fractional decimal digits every [`Fixed`] carries.
pub const COMPUTE_SCALE: u32 = 40;

/// Number of fractional decimal digits that take part in comparisons. Must be
/// strictly smaller than [`COMPUTE_SCALE`].
pub const COMPARE_SCALE: u32 = 20;

/// 10^[`COMPUTE_SCALE`], the denominator of the stored mantissa.
static COMPUTE_UNIT: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(10u32).pow(COMPUTE_SCALE));

/// 10^([`COMPUTE_SCALE`] − [`COMPARE_SCALE`]), the width of one comparison bucket.
static COMPARE_WINDOW: LazyLock<BigInt> =
    LazyLock::new(|| BigInt::from(10u32).pow(COMPUTE_SCALE - COMPARE_SCALE));

/// Per-process random comparison offset, drawn once and never mutated.
/// Mutating it would invalidate every hash computed so far.
static COMPARE_OFFSET: LazyLock<BigInt> = LazyLock::new(|| {
    let window = 10u128.pow(COMPUTE_SCALE - COMPARE_SCALE);
    BigInt::from(fastrand::u128(..window))
});

/// An immutable signed decimal held at exactly [`COMPUTE_SCALE`] fractional
/// digits.
///
/// Arithmetic rounds half-even back to the compute scale. Equality, ordering
/// and hashing all go through `floor((value + offset) · 10^COMPARE_SCALE)`
/// with a random per-process offset, so two values that agree to the compare
/// scale are interchangeable as map keys. Division by an exactly-zero value
/// panics.
#[derive(Clone)]
pub struct Fixed {
    mantissa: BigInt,
}

/// Division with the quotient rounded half to even. `d` may be negative.
fn round_div(n: BigInt, d: &BigInt) -> BigInt {
    let (n, d) = if d.is_negative() {
        (-n, -d.clone())
    } else {
        (n, d.clone())
    };
    let (q, r) = n.div_mod_floor(&d);
    match (&r * 2u8).cmp(&d) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal => {
            if q.is_odd() {
                q + 1
            } else {
                q
            }
        }
    }
}

impl Fixed {
    fn from_mantissa(mantissa: BigInt) -> Fixed {
        Fixed { mantissa }
    }

    #[must_use]
    pub fn zero() -> Fixed {
        Fixed::from_mantissa(BigInt::ZERO)
    }

    #[must_use]
    pub fn one() -> Fixed {
        Fixed::from_mantissa(COMPUTE_UNIT.clone())
    }

    /// The exact ratio `numerator / denominator`, rounded to the compute scale.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    #[must_use]
    pub fn from_ratio(numerator: i64, denominator: i64) -> Fixed {
        assert_ne!(denominator, 0, "denominator must be nonzero");
        Fixed::from_mantissa(round_div(
            BigInt::from(numerator) * &*COMPUTE_UNIT,
            &BigInt::from(denominator),
        ))
    }

    /// The exact value of a binary float, rounded to the compute scale.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not finite.
    #[must_use]
    pub fn from_f64(value: f64) -> Fixed {
        assert!(value.is_finite(), "Fixed cannot represent {value}");
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let exp_bits = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & ((1u64 << 52) - 1);
        let (significand, exponent) = if exp_bits == 0 {
            (frac, -1074)
        } else {
            (frac | (1 << 52), exp_bits - 1075)
        };
        let scaled = BigInt::from(significand) * &*COMPUTE_UNIT;
        let magnitude = if exponent >= 0 {
            scaled << exponent
        } else {
            round_div(scaled, &(BigInt::from(1u8) << (-exponent).unsigned_abs() as usize))
        };
        Fixed::from_mantissa(if negative { -magnitude } else { magnitude })
    }

    /// The comparison bucket of this value. Everything observable about a
    /// `Fixed` (equality, ordering, hashing) is derived from this integer.
    fn key(&self) -> BigInt {
        (&self.mantissa + &*COMPARE_OFFSET).div_floor(&COMPARE_WINDOW)
    }

    #[must_use]
    pub fn cmp_zero(&self) -> Ordering {
        let key = self.key();
        if key.is_negative() {
            Ordering::Less
        } else if key.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.cmp_zero() == Ordering::Equal
    }

    /// True when the mantissa itself is zero, with no comparison fuzz. Series
    /// evaluation terminates on this rather than the fuzzy compare, which
    /// would stop 10^−COMPARE_SCALE too early.
    pub(crate) fn is_exactly_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[must_use]
    pub fn abs(self) -> Fixed {
        if self.cmp_zero() == Ordering::Less {
            -self
        } else {
            self
        }
    }

    /// Square root at the compute scale. Negative inputs saturate to zero to
    /// absorb tiny negative residues of expressions like `r² − a²`.
    #[must_use]
    pub fn sqrt(&self) -> Fixed {
        if self.mantissa.is_negative() {
            return Fixed::zero();
        }
        Fixed::from_mantissa((&self.mantissa * &*COMPUTE_UNIT).sqrt())
    }
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Fixed {}

impl Ord for Fixed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Fixed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<i64> for Fixed {
    fn from(value: i64) -> Self {
        Fixed::from_mantissa(BigInt::from(value) * &*COMPUTE_UNIT)
    }
}

impl From<i32> for Fixed {
    fn from(value: i32) -> Self {
        Fixed::from(i64::from(value))
    }
}

impl From<u32> for Fixed {
    fn from(value: u32) -> Self {
        Fixed::from(i64::from(value))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed decimal literal: {0:?}")]
pub struct ParseFixedError(String);

impl FromStr for Fixed {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseFixedError(s.to_owned());
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = rest.split_once('.').unwrap_or((rest, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let scale = COMPUTE_SCALE as usize;
        let mut digits = String::with_capacity(int_part.len() + scale);
        digits.push_str(if int_part.is_empty() { "0" } else { int_part });
        let kept = frac_part.len().min(scale);
        digits.push_str(&frac_part[..kept]);
        for _ in kept..scale {
            digits.push('0');
        }
        let mut magnitude: BigInt = digits.parse().map_err(|_| malformed())?;

        // Round half-even on the digits beyond the compute scale.
        let rest = &frac_part[kept..];
        if let Some(first) = rest.bytes().next() {
            let tail_nonzero = rest.bytes().skip(1).any(|b| b != b'0');
            if first > b'5' || (first == b'5' && (tail_nonzero || magnitude.is_odd())) {
                magnitude += 1;
            }
        }

        Ok(Fixed::from_mantissa(if negative {
            -magnitude
        } else {
            magnitude
        }))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.mantissa.abs();
        let (int, frac) = magnitude.div_rem(&COMPUTE_UNIT);
        let frac = format!("{frac:040}");
        let frac = frac.trim_end_matches('0');
        if self.mantissa.is_negative() {
            f.write_str("-")?;
        }
        if frac.is_empty() {
            write!(f, "{int}")
        } else {
            write!(f, "{int}.{frac}")
        }
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl AddAssign<&Fixed> for Fixed {
    fn add_assign(&mut self, rhs: &Fixed) {
        self.mantissa += &rhs.mantissa;
    }
}

impl Add<&Fixed> for Fixed {
    type Output = Fixed;

    fn add(mut self, rhs: &Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl SubAssign<&Fixed> for Fixed {
    fn sub_assign(&mut self, rhs: &Fixed) {
        self.mantissa -= &rhs.mantissa;
    }
}

impl Sub<&Fixed> for Fixed {
    type Output = Fixed;

    fn sub(mut self, rhs: &Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl MulAssign<&Fixed> for Fixed {
    fn mul_assign(&mut self, rhs: &Fixed) {
        let lhs = mem::take(&mut self.mantissa);
        self.mantissa = round_div(lhs * &rhs.mantissa, &COMPUTE_UNIT);
    }
}

impl Mul<&Fixed> for Fixed {
    type Output = Fixed;

    fn mul(mut self, rhs: &Self) -> Self::Output {
        self *= rhs;
        self
    }
}

impl DivAssign<&Fixed> for Fixed {
    fn div_assign(&mut self, rhs: &Fixed) {
        let lhs = mem::take(&mut self.mantissa);
        self.mantissa = round_div(lhs * &*COMPUTE_UNIT, &rhs.mantissa);
    }
}

impl Div<&Fixed> for Fixed {
    type Output = Fixed;

    fn div(mut self, rhs: &Self) -> Self::Output {
        self /= rhs;
        self
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Self::Output {
        Fixed::from_mantissa(-self.mantissa)
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Fixed::zero(), |acc, v| acc + &v)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cmp::Ordering,
        hash::{BuildHasher, RandomState},
        sync::LazyLock,
    };

    use super::Fixed;

    static HASHER: LazyLock<RandomState> = LazyLock::new(RandomState::new);

    fn hash_of(value: &Fixed) -> u64 {
        HASHER.hash_one(value)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Fixed::from(1) + &Fixed::from(2), Fixed::from(3));
        assert_eq!(Fixed::from(1) - &Fixed::from(2), Fixed::from(-1));
        assert_eq!(Fixed::from(4) * &Fixed::from(3), Fixed::from(12));
        assert_eq!(Fixed::from(9) / &Fixed::from(3), Fixed::from(3));
        assert_eq!(-Fixed::from(5), Fixed::from(-5));

        assert_eq!(
            [5, 4, 3, 2, 1].into_iter().map(Fixed::from).sum::<Fixed>(),
            Fixed::from(15)
        );
    }

    #[test]
    fn comparisons() {
        assert!(Fixed::zero().is_zero());
        assert_eq!(Fixed::from(-1).cmp_zero(), Ordering::Less);
        assert_eq!(Fixed::from(1).cmp_zero(), Ordering::Greater);
        assert!(Fixed::from(2) < Fixed::from(3));
        assert_eq!(Fixed::from(-3).abs(), Fixed::from(3));
    }

    #[test]
    fn equal_implies_equal_hash() {
        let third = Fixed::from(1) / &Fixed::from(3);
        let also_third = Fixed::from(2) / &Fixed::from(6);
        assert_eq!(third, also_third);
        assert_eq!(hash_of(&third), hash_of(&also_third));
    }

    #[test]
    fn sub_compare_noise_is_invisible() {
        // A perturbation far below the compare scale lands in the same bucket.
        let noise: Fixed = "0.0000000000000000000000000000001".parse().unwrap();
        let x = Fixed::from_ratio(7, 9);
        let y = x.clone() + &noise;
        assert_eq!(x, y);
        assert_eq!(hash_of(&x), hash_of(&y));
        assert_eq!(x.cmp(&y), Ordering::Equal);
    }

    #[test]
    fn sqrt() {
        assert_eq!(Fixed::from(64).sqrt(), Fixed::from(8));
        assert_eq!(Fixed::from(-4).sqrt(), Fixed::zero());
        let two = Fixed::from(2);
        let root = two.sqrt();
        assert_eq!(root.clone() * &root, two);
    }

    #[test]
    fn parse_and_display() {
        let x: Fixed = "2.5".parse().unwrap();
        assert_eq!(x, Fixed::from_ratio(5, 2));
        assert_eq!(x.to_string(), "2.5");

        let y: Fixed = "-0.125".parse().unwrap();
        assert_eq!(y, Fixed::from_ratio(-1, 8));
        assert_eq!(y.to_string(), "-0.125");

        assert!("".parse::<Fixed>().is_err());
        assert!("1.2.3".parse::<Fixed>().is_err());
        assert!("12a".parse::<Fixed>().is_err());
    }

    #[test]
    fn from_f64_is_exact_for_dyadics() {
        assert_eq!(Fixed::from_f64(2.5), Fixed::from_ratio(5, 2));
        assert_eq!(Fixed::from_f64(-0.375), Fixed::from_ratio(-3, 8));
        assert_eq!(Fixed::from_f64(0.0), Fixed::zero());
    }

    #[test]
    fn division_keeps_scale() {
        // 1/3 times 3 rounds back to 1 within the comparison window.
        let third = Fixed::from(1) / &Fixed::from(3);
        assert_eq!(third * &Fixed::from(3), Fixed::from(1));
    }
}
