use std::ops::{Add, AddAssign, Mul, Sub};

use crate::common::error::{QRError, QRResult};

// Exp & log tables for GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const EXP: [u8; 256] = build_exp_table();

pub static EXP_TABLE: [u8; 256] = EXP;

pub static LOG_TABLE: [u8; 256] = build_log_table(&EXP);

const fn build_exp_table() -> [u8; 256] {
    let mut exp = [0u8; 256];
    let mut i = 0;
    while i < 8 {
        exp[i] = 1 << i;
        i += 1;
    }
    while i < 256 {
        exp[i] = exp[i - 4] ^ exp[i - 5] ^ exp[i - 6] ^ exp[i - 8];
        i += 1;
    }
    exp
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut log = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    log
}

pub fn log(n: u8) -> QRResult<u8> {
    if n < 1 {
        return Err(QRError::MathDomain(n));
    }
    Ok(LOG_TABLE[n as usize])
}

// Exponent wraps around the multiplicative group of order 255
pub fn exp(n: i32) -> u8 {
    EXP_TABLE[n.rem_euclid(255) as usize]
}


// Galois field element
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct G(pub u8);

impl G {
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn log(self) -> QRResult<u8> {
        log(self.0)
    }

    pub fn gen_pow(i: i32) -> Self {
        G(exp(i))
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        G(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Sub for G {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        G(self.0 ^ rhs.0)
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return G(0);
        }
        let log_sum = LOG_TABLE[self.0 as usize] as i32 + LOG_TABLE[rhs.0 as usize] as i32;
        G(exp(log_sum))
    }
}
