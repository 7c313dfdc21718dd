//! Exact rational numbers for unit scales and offsets.
use core::fmt;

/// A reduced fraction with a strictly positive denominator.
///
/// Every unit scale and offset is stored as a `Ratio` so that composing units
/// (`kt h`, `ft^3`) never accumulates floating point error. The `const fn`
/// operations panic on overflow, which turns into a compile error when they are
/// evaluated for static units; the `checked_*` variants are used at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ratio {
    num: i128,
    den: i128,
}

const fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Ratio {
    pub const ZERO: Ratio = Ratio { num: 0, den: 1 };
    pub const ONE: Ratio = Ratio { num: 1, den: 1 };

    pub const fn new(num: i128, den: i128) -> Self {
        match Self::checked_new(num, den) {
            Some(ratio) => ratio,
            None => panic!("ratio denominator must be non-zero"),
        }
    }

    pub const fn integer(num: i128) -> Self {
        Ratio { num, den: 1 }
    }

    pub const fn checked_new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        Some(Ratio { num, den })
    }

    pub const fn numerator(&self) -> i128 {
        self.num
    }

    pub const fn denominator(&self) -> i128 {
        self.den
    }

    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub const fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub const fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Multiplies `value` by the ratio, numerator first.
    pub fn apply(self, value: f64) -> f64 {
        value * self.num as f64 / self.den as f64
    }

    pub const fn checked_mul(self, rhs: Ratio) -> Option<Ratio> {
        // cross-reduce first so intermediate products stay small
        let g1 = gcd(self.num.unsigned_abs(), rhs.den.unsigned_abs()) as i128;
        let g2 = gcd(rhs.num.unsigned_abs(), self.den.unsigned_abs()) as i128;
        let num = match (self.num / g1).checked_mul(rhs.num / g2) {
            Some(n) => n,
            None => return None,
        };
        let den = match (self.den / g2).checked_mul(rhs.den / g1) {
            Some(d) => d,
            None => return None,
        };
        Self::checked_new(num, den)
    }

    pub const fn checked_recip(self) -> Option<Ratio> {
        Self::checked_new(self.den, self.num)
    }

    pub const fn checked_div(self, rhs: Ratio) -> Option<Ratio> {
        match rhs.checked_recip() {
            Some(recip) => self.checked_mul(recip),
            None => None,
        }
    }

    pub const fn checked_add(self, rhs: Ratio) -> Option<Ratio> {
        let g = gcd(self.den.unsigned_abs(), rhs.den.unsigned_abs()) as i128;
        let lhs_num = match self.num.checked_mul(rhs.den / g) {
            Some(n) => n,
            None => return None,
        };
        let rhs_num = match rhs.num.checked_mul(self.den / g) {
            Some(n) => n,
            None => return None,
        };
        let num = match lhs_num.checked_add(rhs_num) {
            Some(n) => n,
            None => return None,
        };
        let den = match (self.den / g).checked_mul(rhs.den) {
            Some(d) => d,
            None => return None,
        };
        Self::checked_new(num, den)
    }

    pub const fn checked_sub(self, rhs: Ratio) -> Option<Ratio> {
        self.checked_add(Ratio {
            num: -rhs.num,
            den: rhs.den,
        })
    }

    /// Raises the ratio to an integer power. `0^-n` yields `None`.
    pub const fn checked_powi(self, exp: i32) -> Option<Ratio> {
        let base = if exp < 0 {
            match self.checked_recip() {
                Some(r) => r,
                None => return None,
            }
        } else {
            self
        };
        let mut acc = Ratio::ONE;
        let mut i = 0;
        while i < exp.unsigned_abs() {
            acc = match acc.checked_mul(base) {
                Some(r) => r,
                None => return None,
            };
            i += 1;
        }
        Some(acc)
    }

    pub const fn mul(self, rhs: Ratio) -> Ratio {
        match self.checked_mul(rhs) {
            Some(r) => r,
            None => panic!("ratio overflow in multiplication"),
        }
    }

    pub const fn div(self, rhs: Ratio) -> Ratio {
        match self.checked_div(rhs) {
            Some(r) => r,
            None => panic!("ratio overflow or division by zero"),
        }
    }

    pub const fn add(self, rhs: Ratio) -> Ratio {
        match self.checked_add(rhs) {
            Some(r) => r,
            None => panic!("ratio overflow in addition"),
        }
    }

    pub const fn sub(self, rhs: Ratio) -> Ratio {
        match self.checked_sub(rhs) {
            Some(r) => r,
            None => panic!("ratio overflow in subtraction"),
        }
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::ZERO
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
