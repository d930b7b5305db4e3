use std::ops::{Deref, Not};

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;
use super::version_db::{alignment_pattern_positions, rs_blocks, BlockSpec};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl From<bool> for Color {
    fn from(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(usize);

impl Version {
    pub fn new(version: usize) -> QRResult<Self> {
        if !(1..=40).contains(&version) {
            return Err(QRError::InvalidVersion);
        }
        Ok(Self(version))
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        alignment_pattern_positions(self.0)
    }

    // Bit width of the character count field for byte mode
    pub fn char_cnt_bits(self) -> usize {
        match self.0 {
            1..=9 => 8,
            _ => 16,
        }
    }

    pub fn rs_blocks(self, ec_level: ECLevel) -> QRResult<Vec<BlockSpec>> {
        rs_blocks(self.0, ec_level)
    }

    pub fn data_codewords(self, ec_level: ECLevel) -> QRResult<usize> {
        Ok(self.rs_blocks(ec_level)?.iter().map(|b| b.data).sum())
    }

    pub fn data_bit_capacity(self, ec_level: ECLevel) -> QRResult<usize> {
        Ok(self.data_codewords(ec_level)? << 3)
    }

    pub fn total_codewords(self, ec_level: ECLevel) -> QRResult<usize> {
        Ok(self.rs_blocks(ec_level)?.iter().map(|b| b.total).sum())
    }

    // BCH coded version info, only drawn for versions 7 and up
    pub fn info(self) -> u32 {
        bch_version_info(self.0 as u32)
    }
}

// Builder default, holds 34 bytes at level H
impl Default for Version {
    fn default() -> Self {
        Self(4)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


// Error correction level
//------------------------------------------------------------------------------

// Discriminants are the 2-bit level indicators written into format info
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ECLevel {
    L = 1,
    M = 0,
    Q = 3,
    H = 2,
}

impl ECLevel {
    pub fn bits(self) -> u32 {
        self as u32
    }

    // Row offset within the block table, ordered by increasing redundancy
    pub(crate) fn table_index(self) -> usize {
        match self {
            Self::L => 0,
            Self::M => 1,
            Self::Q => 2,
            Self::H => 3,
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

pub fn generate_format_info(ec_level: ECLevel, mask: MaskPattern) -> u32 {
    bch_format_info((ec_level.bits() << 3) | *mask as u32)
}

// Number of significant bits
pub fn bit_len(x: u32) -> u32 {
    u32::BITS - x.leading_zeros()
}

fn bch_remainder(data: u32, shift: u32, gen: u32) -> u32 {
    let mut d = data << shift;
    while bit_len(d) >= bit_len(gen) {
        d ^= gen << (bit_len(d) - bit_len(gen));
    }
    d
}

pub fn bch_format_info(data: u32) -> u32 {
    ((data << 10) | bch_remainder(data, 10, FORMAT_INFO_GENERATOR)) ^ FORMAT_INFO_MASK
}

pub fn bch_version_info(data: u32) -> u32 {
    (data << 12) | bch_remainder(data, 12, VERSION_INFO_GENERATOR)
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static FORMAT_INFO_GENERATOR: u32 = 0x537;

static FORMAT_INFO_MASK: u32 = 0x5412;

static VERSION_INFO_GENERATOR: u32 = 0x1f25;

// Coordinates are listed from the most significant bit. Negative values wrap from
// the far edge of the symbol.
pub static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];
