use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// An inclusive interval `[lo, hi]`.
///
/// Nothing stops `lo` from being greater than `hi`; such an interval simply contains no values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<T> {
    pub lo: T,
    pub hi: T,
}

impl<T: PartialOrd> Bounds<T> {
    pub fn new(lo: T, hi: T) -> Self {
        Bounds { lo, hi }
    }

    /// Returns true if `lo <= v <= hi`.
    pub fn contains(&self, v: T) -> bool {
        (self.lo <= v) && (v <= self.hi)
    }
}

/// A bound as supplied by a caller: either a bare upper bound, which is equivalent to
/// `(0, hi)`, or an explicit `(lo, hi)` pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BoundsSpec<T> {
    Upper(T),
    Range(T, T),
}

impl<T: Default> BoundsSpec<T> {
    /// Collapses the bound into an inclusive interval. `T::default()` is taken as the
    /// lower bound of a bare upper bound.
    pub fn normalize(self) -> Bounds<T> {
        match self {
            BoundsSpec::Upper(hi) => Bounds { lo: T::default(), hi },
            BoundsSpec::Range(lo, hi) => Bounds { lo, hi },
        }
    }
}

impl<T: Display> Display for BoundsSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundsSpec::Upper(hi) => write!(f, "{hi}"),
            BoundsSpec::Range(lo, hi) => write!(f, "{lo},{hi}"),
        }
    }
}

/// Error type for parsing a bounds string.
#[derive(Debug, Error)]
#[error("Invalid bounds format: {0}")]
pub struct ParseBoundsErr(String);

impl<T: FromStr + PartialOrd> FromStr for BoundsSpec<T> {
    type Err = ParseBoundsErr;

    fn from_str(arg: &str) -> Result<BoundsSpec<T>, Self::Err> {
        let arg_lc = arg.to_lowercase();
        let parts: Vec<&str> = arg_lc.split(',').map(str::trim).collect();

        let parse = |s: &str, which: &str| -> Result<T, ParseBoundsErr> {
            let invalid = || ParseBoundsErr(format!("Invalid {which} value: '{s}' in '{arg}'"));
            let v = s.parse::<T>().map_err(|_| invalid())?;
            // NaN is the only value not comparable to itself
            match v.partial_cmp(&v) {
                Some(_) => Ok(v),
                None => Err(invalid()),
            }
        };

        match parts[..] {
            [hi] => Ok(BoundsSpec::Upper(parse(hi, "maximum")?)),
            [lo, hi] => Ok(BoundsSpec::Range(
                parse(lo, "minimum")?,
                parse(hi, "maximum")?,
            )),
            _ => Err(ParseBoundsErr(indoc::formatdoc! {"
            Expected format '<max>' or '<min>,<max>', got '{arg}'. Both ends \
            are inclusive, as in:
              --len 150
              --len 50,150
              --gc 20,80
            "})),
        }
    }
}
