mod ec;
mod qr;

pub use ec::error_correction_capacity;
pub use qr::{Module, QR};

use std::borrow::Cow;
use std::ops::Deref;

use encoding_rs::Encoding;
use log::debug;

use crate::common::{
    codec::encode_with_version,
    error::{QRError, QRResult},
    mask::{find_best_mask, MaskPattern},
    metadata::{generate_format_info, ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: Cow<'a, [u8]>,
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            version: Version::default(),
            ec_level: ECLevel::H,
            mask: None,
        }
    }

    // Encodes text into bytes of the given character encoding. Characters the
    // encoding can't represent are rejected rather than replaced.
    pub fn from_text(text: &'a str, encoding: &'static Encoding) -> QRResult<Self> {
        let (bytes, _, has_err) = encoding.encode(text);
        if has_err {
            return Err(QRError::InvalidChar);
        }
        Ok(Self { data: bytes, version: Version::default(), ec_level: ECLevel::H, mask: None })
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = Cow::Borrowed(data);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = version;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        format!("{{ Version: {}, Ec level: {:?}, Mask: {mask} }}", *self.version, self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());

        let mut qr = self.build_unmasked()?;

        let mask = match self.mask {
            Some(m) => {
                debug!("Applying mask {}...", *m);
                m
            }
            None => {
                debug!("Finding best mask...");
                find_best_mask(&qr)
            }
        };
        qr.apply_mask(mask);

        debug!("Drawing format & version info...");
        qr.draw_format_info(generate_format_info(self.ec_level, mask));
        qr.draw_version_info();

        debug_assert!(!qr.grid().contains(&Module::Empty), "Empty module found in final symbol");

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!("QR generated: {}", qr.metadata());
        debug!(
            "Data size: {}, Data capacity: {}, Error capacity: {}",
            self.data.len(),
            self.version.data_codewords(self.ec_level)?,
            error_correction_capacity(self.version, self.ec_level)?
        );
        debug!(
            "Dark cells: {}, Light cells: {}, Balance: {}%",
            dark_modules,
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    // Function patterns, reserved info areas and unmasked data. Mask candidates
    // are scored against clones of this symbol.
    pub(crate) fn build_unmasked(&self) -> QRResult<QR> {
        let payload = self.codewords()?;

        debug!("Drawing function patterns...");
        let mut qr = QR::new(self.version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.reserve_format_area();
        qr.reserve_version_area();

        debug!("Drawing encoding region...");
        qr.draw_encoding_region(&payload);
        Ok(qr)
    }

    // Data codewords followed by ec codewords, each interleaved across blocks
    pub(crate) fn codewords(&self) -> QRResult<Vec<u8>> {
        debug!("Encoding data...");
        let encoded_data = encode_with_version(&self.data, self.version, self.ec_level)?;

        debug!("Constructing payload with ecc & interleaving...");
        let blocks = self.version.rs_blocks(self.ec_level)?;
        let (data_blocks, ecc_blocks) = ec::ecc(encoded_data.data(), &blocks)?;

        let mut payload = Self::interleave(&data_blocks);
        payload.extend(Self::interleave(&ecc_blocks));
        debug_assert_eq!(
            payload.len(),
            self.version.total_codewords(self.ec_level)?,
            "Payload doesn't fill the symbol"
        );
        Ok(payload)
    }

    // Takes the i-th codeword of every block in turn, skipping blocks that ran out
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::QRBuilder;
    use crate::common::{
        error::QRError,
        mask::{compute_total_penalty, MaskPattern},
        metadata::{ECLevel, Version},
    };

    fn hello_world_builder() -> QRBuilder<'static> {
        let mut builder = QRBuilder::new(b"Hello World!");
        builder.version(Version::new(4).unwrap()).ec_level(ECLevel::H);
        builder
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = QRBuilder::interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }

    #[test]
    fn test_interleave_empty() {
        let blocks: Vec<Vec<u8>> = vec![];
        assert!(QRBuilder::interleave(&blocks).is_empty());
    }

    #[test]
    fn test_codewords() {
        let exp = [
            64, 247, 236, 17, 196, 38, 17, 236, 134, 198, 236, 17, 86, 66, 17, 236, 198, 16, 236,
            17, 198, 236, 17, 236, 242, 17, 236, 17, 5, 236, 17, 236, 118, 17, 236, 17, 134, 208,
            116, 198, 106, 72, 96, 20, 241, 2, 131, 210, 101, 101, 21, 185, 85, 109, 58, 154, 148,
            218, 134, 34, 176, 92, 64, 148, 134, 170, 110, 135, 152, 254, 67, 218, 123, 113, 220,
            181, 254, 224, 237, 170, 141, 205, 52, 82, 225, 4, 178, 14, 17, 111, 169, 174, 171,
            181, 223, 209, 145, 135, 126, 229,
        ];
        assert_eq!(hello_world_builder().codewords().unwrap(), exp);
    }

    #[test]
    fn test_mask_penalties() {
        let base = hello_world_builder().build_unmasked().unwrap();
        let penalties = (0..8)
            .map(|m| {
                let mut qr = base.clone();
                qr.apply_mask(MaskPattern::new(m).unwrap());
                compute_total_penalty(&qr)
            })
            .collect::<Vec<_>>();
        assert_eq!(penalties, vec![2152, 2139, 1908, 2031, 2032, 2026, 2130, 1961]);
    }

    #[test]
    fn test_build_picks_lowest_penalty() {
        let qr = hello_world_builder().build().unwrap();
        assert_eq!(qr.mask(), Some(MaskPattern::new(2).unwrap()));
        assert_eq!(qr.metadata(), "{ Version: 4, Ec level: H, Mask: 2 }");
    }

    #[test_case(0)]
    #[test_case(5)]
    #[test_case(7)]
    fn test_build_forced_mask(m: u8) {
        let mask = MaskPattern::new(m).unwrap();
        let qr = hello_world_builder().mask(mask).build().unwrap();
        assert_eq!(qr.mask(), Some(mask));
    }

    #[test]
    fn test_build_empty_data() {
        let qr = QRBuilder::new(b"").version(Version::new(1).unwrap()).build().unwrap();
        assert_eq!(qr.width(), 21);
    }

    #[test]
    fn test_builder_data_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res.err(), Some(QRError::DataTooLong { len: 24500, capacity: 10208 }));
    }

    #[test]
    fn test_default_version_is_not_upgraded() {
        let data = [b'a'; 35];
        let res = QRBuilder::new(&data).build();
        assert_eq!(res.err(), Some(QRError::DataTooLong { len: 292, capacity: 288 }));
    }
}
