use std::ops::Deref;

use crate::common::{
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::*,
};

// Module
//------------------------------------------------------------------------------

// A cell of the symbol, tagged with the structure it belongs to
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) | Module::Version(c) | Module::Format(c) | Module::Data(c) => c,
        }
    }
}

// QR symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w].into_boxed_slice(), w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    // Module count along one side
    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    // Always set on a symbol returned by the builder
    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> String {
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        format!("{{ Version: {}, Ec level: {:?}, Mask: {mask} }}", *self.ver, self.ecl)
    }

    pub fn is_dark(&self, row: i32, col: i32) -> QRResult<bool> {
        let w = self.w as i32;
        if !(0..w).contains(&row) || !(0..w).contains(&col) {
            return Err(QRError::IndexOutOfRange { row, col, width: self.w });
        }
        Ok(*self.grid[(row * w + col) as usize] == Color::Dark)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| **m == Color::Dark).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(clr) => clr.select('F', 'f'),
                    Module::Version(clr) => clr.select('V', 'v'),
                    Module::Format(clr) => clr.select('M', 'm'),
                    Module::Data(clr) => clr.select('D', 'd'),
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of range for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of range for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub(crate) fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Module, QR};
    use crate::common::error::QRError;
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_index_wrap() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(0, -(w + 1));
    }

    #[test]
    fn test_is_dark() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.set(3, 4, Module::Data(Color::Dark));
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.is_dark(3, 4), Ok(true));
        assert_eq!(qr.is_dark(4, 3), Ok(false));
        assert_eq!(qr.is_dark(20, 20), Ok(true));
        assert_eq!(qr.count_dark_modules(), 2);
    }

    #[test]
    fn test_is_dark_out_of_range() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        for (row, col) in [(-1, 0), (0, -1), (21, 0), (0, 21), (21, 21)] {
            assert_eq!(qr.is_dark(row, col), Err(QRError::IndexOutOfRange { row, col, width: 21 }));
        }
    }

    #[test]
    fn test_metadata() {
        let qr = QR::new(Version::new(7).unwrap(), ECLevel::Q);
        assert_eq!(qr.metadata(), "{ Version: 7, Ec level: Q, Mask: None }");
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        let far = self.w as i16 - 4;
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, far);
        self.draw_finder_pattern_at(far, 3);
    }

    // Concentric rings around the center by chebyshev distance. Ring 4 is the
    // separator and is clipped at the symbol edge.
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        for i in -4..=4i16 {
            for j in -4..=4i16 {
                let (row, col) = (r + i, c + j);
                if !(0..w).contains(&row) || !(0..w).contains(&col) {
                    continue;
                }
                let clr = match i.abs().max(j.abs()) {
                    2 | 4 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(row, col, Module::Func(clr));
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    // Alternating line between the separators, leaving taken modules as they are
    fn draw_timing_pattern(&mut self) {
        for i in 8..self.w as i16 - 8 {
            let m = Module::Func(Color::from(i & 1 == 0));
            if self.get(6, i) == Module::Empty {
                self.set(6, i, m);
            }
            if self.get(i, 6) == Module::Empty {
                self.set(i, 6, m);
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    // Skipped where the center already belongs to a finder pattern
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        if self.get(r, c) != Module::Empty {
            return;
        }
        for i in -2..=2i16 {
            for j in -2..=2i16 {
                let clr = match i.abs().max(j.abs()) {
                    1 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    // Alignment patterns go before timing so the timing line runs through them
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_alignment_patterns();
        self.draw_timing_pattern();
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(Version::new(3).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............Ffffffff\n\
             fFFFFFfF.............FfFFFFFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFFFFFfF.............FfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFF.............FFFFFFFF\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f.............fffff....\n\
             FFFFFFFF............fFFFf....\n\
             fffffffF............fFfFf....\n\
             fFFFFFfF............fFFFf....\n\
             fFfffFfF............fffff....\n\
             fFfffFfF.....................\n\
             fFfffFfF.....................\n\
             fFFFFFfF.....................\n\
             fffffffF.....................\n"
        );
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // Holds the format strips light while masks are evaluated. The fixed dark
    // module is drawn with them.
    pub(crate) fn reserve_format_area(&mut self) {
        self.draw_format_info(0);
    }

    pub(crate) fn reserve_version_area(&mut self) {
        self.draw_version_number(0);
    }

    pub(crate) fn draw_format_info(&mut self, format_info: u32) {
        for coords in [&FORMAT_INFO_COORDS_MAIN, &FORMAT_INFO_COORDS_SIDE] {
            self.draw_number(
                format_info,
                FORMAT_INFO_BIT_LEN,
                Module::Format(Color::Light),
                Module::Format(Color::Dark),
                coords,
            );
        }
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    pub(crate) fn draw_version_info(&mut self) {
        self.draw_version_number(self.ver.info());
    }

    fn draw_version_number(&mut self, ver_info: u32) {
        if *self.ver < 7 {
            return;
        }
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            self.draw_number(
                ver_info,
                VERSION_INFO_BIT_LEN,
                Module::Version(Color::Light),
                Module::Version(Color::Dark),
                coords,
            );
        }
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            if number & mask == 0 {
                self.set(r, c, off_clr);
            } else {
                self.set(r, c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Fills every empty module with payload bits, most significant bit of each
    // codeword first. Modules left over once the payload runs out stay light.
    pub(crate) fn draw_encoding_region(&mut self, payload: &[u8]) {
        let mut bits = payload.iter().flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1));
        for (r, c) in EncRegionIter::new(self.ver) {
            if self.get(r, c) == Module::Empty {
                let clr = Color::from(bits.next().unwrap_or(false));
                self.set(r, c, Module::Data(clr));
            }
        }

        debug_assert!(bits.next().is_none(), "Payload overflows the encoding region");
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found after drawing");
    }

    // Flips data modules wherever the pattern's function holds
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(clr) = self.get(r, c) {
                    if mask_fn(r, c) {
                        self.set(r, c, Module::Data(!clr));
                    }
                }
            }
        }
    }
}
