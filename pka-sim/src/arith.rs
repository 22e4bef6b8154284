//! Modular and elliptic curve arithmetic backing the model.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Affine point, `None` is the point at infinity.
pub(crate) type Point = Option<(BigUint, BigUint)>;

/// Short Weierstrass curve y<sup>2</sup> = x<sup>3</sup> + ax + b over GF(p).
pub(crate) struct Curve {
    pub p: BigUint,
    pub a: BigUint,
}

impl Curve {
    /// Create a curve from |a| and the sign of a.
    pub fn new(p: BigUint, abs_a: BigUint, negative: bool) -> Curve {
        let abs_a: BigUint = abs_a % &p;
        let a: BigUint = if negative && !abs_a.is_zero() {
            &p - abs_a
        } else {
            abs_a
        };
        Curve { p, a }
    }

    fn sub(&self, x: &BigUint, y: &BigUint) -> BigUint {
        ((x % &self.p) + &self.p - (y % &self.p)) % &self.p
    }

    /// Multiplicative inverse for prime p.
    fn inv(&self, x: &BigUint) -> BigUint {
        inv_prime(x, &self.p)
    }

    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let (x1, y1) = match lhs {
            Some(pt) => pt,
            None => return rhs.clone(),
        };
        let (x2, y2) = match rhs {
            Some(pt) => pt,
            None => return lhs.clone(),
        };
        let p: &BigUint = &self.p;

        let lambda: BigUint = if x1 == x2 {
            if ((y1 + y2) % p).is_zero() {
                return None;
            }
            let num: BigUint = (BigUint::from(3u8) * x1 * x1 + &self.a) % p;
            num * self.inv(&((BigUint::from(2u8) * y1) % p)) % p
        } else {
            self.sub(y2, y1) * self.inv(&self.sub(x2, x1)) % p
        };

        let x3: BigUint = self.sub(&self.sub(&(&lambda * &lambda), x1), x2);
        let y3: BigUint = self.sub(&(&lambda * self.sub(x1, &x3)), y1);
        Some((x3, y3))
    }

    /// Double-and-add scalar multiplication.
    pub fn mul(&self, k: &BigUint, pt: &Point) -> Point {
        let mut acc: Point = None;
        (0..k.bits()).rev().for_each(|bit| {
            acc = self.add(&acc, &acc);
            if k.bit(bit) {
                acc = self.add(&acc, pt);
            }
        });
        acc
    }

    pub fn contains(&self, x: &BigUint, y: &BigUint, b: &BigUint) -> bool {
        let p: &BigUint = &self.p;
        if x >= p || y >= p {
            return false;
        }
        let lhs: BigUint = y * y % p;
        let rhs: BigUint = (x * x * x + &self.a * x + b) % p;
        lhs == rhs
    }
}

/// Multiplicative inverse of `x` modulo the prime `m`.
pub(crate) fn inv_prime(x: &BigUint, m: &BigUint) -> BigUint {
    x.modpow(&(m - BigUint::from(2u8)), m)
}

/// Montgomery parameter R<sup>2</sup> mod m with R = 2<sup>32 × words</sup>.
pub(crate) fn montgomery_param(m: &BigUint, words: usize) -> BigUint {
    (BigUint::one() << (64 * words)) % m
}

/// RSA CRT exponentiation.
pub(crate) fn crt_exp(
    base: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    qinv: &BigUint,
) -> BigUint {
    let m1: BigUint = base.modpow(dp, p);
    let m2: BigUint = base.modpow(dq, q);
    let diff: BigUint = (m1 + p - (&m2).mod_floor(p)) % p;
    let h: BigUint = qinv * diff % p;
    m2 + h * q
}

/// ECDSA signature, `Err(1)` when r is zero and `Err(2)` when s is zero.
pub(crate) fn ecdsa_sign(
    curve: &Curve,
    g: &Point,
    n: &BigUint,
    d: &BigUint,
    k: &BigUint,
    z: &BigUint,
) -> Result<(BigUint, BigUint), u32> {
    let r: BigUint = match curve.mul(k, g) {
        Some((x1, _)) => x1 % n,
        None => BigUint::zero(),
    };
    if r.is_zero() {
        return Err(1);
    }
    let s: BigUint = inv_prime(&(k % n), n) * ((z + &r * d) % n) % n;
    if s.is_zero() {
        return Err(2);
    }
    Ok((r, s))
}

/// ECDSA verification.
pub(crate) fn ecdsa_verify(
    curve: &Curve,
    g: &Point,
    n: &BigUint,
    q: &Point,
    z: &BigUint,
    r: &BigUint,
    s: &BigUint,
) -> bool {
    if r.is_zero() || s.is_zero() || r >= n || s >= n {
        return false;
    }
    let w: BigUint = inv_prime(s, n);
    let u1: BigUint = z * &w % n;
    let u2: BigUint = r * &w % n;
    match curve.add(&curve.mul(&u1, g), &curve.mul(&u2, q)) {
        Some((x, _)) => &(x % n) == r,
        None => false,
    }
}
