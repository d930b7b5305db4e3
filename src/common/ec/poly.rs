use std::ops::Deref;

use super::galois::G;
use crate::common::error::{QRError, QRResult};

// Polynomial over GF(256), highest degree coefficient first
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Poly(Vec<G>);

impl Poly {
    // Strips leading zeros and multiplies by x^shift. An all zero input
    // collapses to the zero polynomial [0].
    pub fn new(coeffs: &[u8], shift: usize) -> Self {
        let lead = coeffs.iter().take_while(|&&c| c == 0).count();
        if lead == coeffs.len() {
            return Self::zero();
        }
        let mut res = Vec::with_capacity(coeffs.len() - lead + shift);
        res.extend(coeffs[lead..].iter().map(|&c| G(c)));
        res.resize(coeffs.len() - lead + shift, G(0));
        Self(res)
    }

    pub fn zero() -> Self {
        Self(vec![G(0)])
    }

    pub fn is_zero(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_zero()
    }

    pub fn degree(&self) -> usize {
        self.0.len() - 1
    }

    pub fn coeffs(&self) -> Vec<u8> {
        self.0.iter().map(|&g| g.into()).collect()
    }

    // Generator polynomial (x - a^0)(x - a^1)...(x - a^(ec_len - 1))
    pub fn generator(ec_len: usize) -> Self {
        (0..ec_len as i32)
            .fold(Self::new(&[1], 0), |acc, i| acc.multiply(&Self::new(&[1, G::gen_pow(i).0], 0)))
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let mut res = vec![G(0); self.0.len() + other.0.len() - 1];
        for (i, &a) in self.0.iter().enumerate() {
            for (j, &b) in other.0.iter().enumerate() {
                res[i + j] += a * b;
            }
        }
        let res: Vec<u8> = res.into_iter().map(u8::from).collect();
        Self::new(&res, 0)
    }

    // Long division keeping only the remainder. Each step cancels the leading
    // term of the running dividend, so the loop runs at most deg(self) - deg(den) + 1 times.
    pub fn rem(&self, den: &Self) -> QRResult<Self> {
        if den.is_zero() {
            return Err(QRError::MathDomain(0));
        }

        let den_len = den.0.len();
        let log_den_lead = den.0[0].log()? as i32;
        let mut num = self.0.clone();
        let mut start = 0;

        while num.len() - start >= den_len {
            let lead = num[start];
            if lead.is_zero() {
                start += 1;
                continue;
            }

            let ratio = lead.log()? as i32 - log_den_lead;
            for (u, &v) in num[start..start + den_len].iter_mut().zip(den.0.iter()) {
                if !v.is_zero() {
                    *u += G::gen_pow(v.log()? as i32 + ratio);
                }
            }

            start += num[start..].iter().take_while(|g| g.is_zero()).count();
            if start == num.len() {
                return Ok(Self::zero());
            }
        }

        let rem: Vec<u8> = num[start..].iter().map(|&g| g.into()).collect();
        Ok(Self::new(&rem, 0))
    }
}

impl Deref for Poly {
    type Target = [G];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
