use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Deref;

use log::trace;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Default)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern > 7 {
            return Err(QRError::InvalidMaskingPattern);
        }
        Ok(Self(pattern))
    }

    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

// Functions take (row, col) and return true where the data module is flipped
mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    // i16 is too narrow for r * c at 177 modules
    pub fn fields(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (p & 1) + (p % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p & 1) + (p % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p % 3) + ((r + c) as i32 & 1)) & 1 == 0
    }
}

#[cfg(test)]
mod mask_pattern_tests {
    use test_case::test_case;

    use super::MaskPattern;
    use crate::common::error::QRError;

    #[test]
    fn test_new() {
        for m in 0..8 {
            assert_eq!(*MaskPattern::new(m).unwrap(), m);
        }
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidMaskingPattern));
        assert_eq!(MaskPattern::new(255), Err(QRError::InvalidMaskingPattern));
    }

    // First two rows of each pattern over a 6 column window, '#' where the module flips
    #[test_case(0, "#.#.#.", ".#.#.#")]
    #[test_case(1, "######", "......")]
    #[test_case(2, "#..#..", "#..#..")]
    #[test_case(3, "#..#..", "..#..#")]
    #[test_case(4, "###...", "###...")]
    #[test_case(5, "######", "#.....")]
    #[test_case(6, "######", "###...")]
    #[test_case(7, "#.#.#.", "...###")]
    fn test_mask_function(pattern: u8, row0: &str, row1: &str) {
        let mask_fn = MaskPattern::new(pattern).unwrap().mask_function();
        let render =
            |r| (0..6).map(|c| if mask_fn(r, c) { '#' } else { '.' }).collect::<String>();
        assert_eq!(render(0), row0);
        assert_eq!(render(1), row1);
    }

    #[test]
    fn test_mask_function_no_overflow() {
        for m in 5..8 {
            let mask_fn = MaskPattern::new(m).unwrap().mask_function();
            mask_fn(176, 176);
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Evaluates every pattern against the unmasked symbol
pub fn find_best_mask(qr: &QR) -> MaskPattern {
    lowest_penalty_mask(|m| {
        let mut candidate = qr.clone();
        candidate.apply_mask(m);
        let pen = compute_total_penalty(&candidate);
        trace!("Mask {}: total penalty {pen}", *m);
        pen
    })
}

// Ties go to the lowest pattern
fn lowest_penalty_mask(penalty: impl Fn(MaskPattern) -> u32) -> MaskPattern {
    (0..8).map(MaskPattern).min_by_key(|&m| penalty(m)).unwrap_or_default()
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    trace!(
        "Penalties: adjacent {adj_pen}, block {blk_pen}, finder {}, balance {bal_pen}",
        fp_pen_h + fp_pen_v
    );
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

#[cfg(test)]
mod selection_tests {
    use super::{lowest_penalty_mask, MaskPattern};

    #[test]
    fn test_lowest_penalty_wins() {
        let pens = [50, 40, 30, 20, 10, 20, 30, 40];
        assert_eq!(lowest_penalty_mask(|m| pens[*m as usize]), MaskPattern::new(4).unwrap());
    }

    #[test]
    fn test_tie_goes_to_first_pattern() {
        let pens = [90, 80, 70, 15, 60, 15, 50, 15];
        assert_eq!(lowest_penalty_mask(|m| pens[*m as usize]), MaskPattern::new(3).unwrap());
        assert_eq!(lowest_penalty_mask(|_| 7), MaskPattern::new(0).unwrap());
    }
}

// Counts same colored modules in the 8-neighborhood of every module, clipped at
// the edges. Crowded modules cost 3 plus the excess over 5.
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w {
        for c in 0..w {
            let clr = *qr.get(r, c);
            let mut same = 0;
            for dr in -1..=1 {
                for dc in -1..=1 {
                    let (nr, nc) = (r + dr, c + dc);
                    if (dr, dc) == (0, 0) || nr < 0 || nr >= w || nc < 0 || nc >= w {
                        continue;
                    }
                    if *qr.get(nr, nc) == clr {
                        same += 1;
                    }
                }
            }
            if same > 5 {
                pen += 3 + (same - 5);
            }
        }
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// Every 1:1:3:1:1 run in a line costs 40, whatever surrounds it
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        for j in 0..w - 6 {
            if (j..j + 7).map(get).eq(PATTERN.iter().copied()) {
                pen += 40;
            }
        }
    }
    pen
}

// 10 points per 5% the dark ratio strays from 50%, rounded half away from zero
fn compute_balance_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let dark_pct = qr.count_dark_modules() as f64 * 100.0 / (w * w) as f64;
    ((dark_pct - 50.0).abs() / 5.0).round() as u32 * 10
}
