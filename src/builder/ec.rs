use crate::common::{
    ec::Poly,
    error::QRResult,
    metadata::{ECLevel, Version},
    version_db::BlockSpec,
};

// ECC: Error Correction Codeword generator
pub fn ecc<'a>(data: &'a [u8], blocks: &[BlockSpec]) -> QRResult<(Vec<&'a [u8]>, Vec<Vec<u8>>)> {
    let data_blocks = blockify(data, blocks);

    // Every block of a version & ec level carries the same ec length
    let ec_len = blocks.first().map_or(0, BlockSpec::ec_len);
    debug_assert!(blocks.iter().all(|b| b.ec_len() == ec_len), "Uneven ec length across blocks");

    let gen_poly = Poly::generator(ec_len);
    debug_assert_eq!(gen_poly.degree(), ec_len);
    let ecc_blocks = data_blocks
        .iter()
        .map(|b| ecc_per_block(b, &gen_poly, ec_len))
        .collect::<QRResult<Vec<_>>>()?;

    Ok((data_blocks, ecc_blocks))
}

pub fn blockify<'a>(data: &'a [u8], blocks: &[BlockSpec]) -> Vec<&'a [u8]> {
    let total_size = blocks.iter().map(|b| b.data).sum::<usize>();
    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(blocks.len());
    let mut offset = 0;
    for b in blocks {
        data_blocks.push(&data[offset..offset + b.data]);
        offset += b.data;
    }
    data_blocks
}

// Remainder of the block shifted by ec_len, divided by the generator polynomial.
// The remainder drops leading zeros, so it is padded back to ec_len codewords.
fn ecc_per_block(block: &[u8], gen_poly: &Poly, ec_len: usize) -> QRResult<Vec<u8>> {
    let rem = Poly::new(block, ec_len).rem(gen_poly)?;
    let coeffs = if rem.is_zero() { Vec::new() } else { rem.coeffs() };

    let mut res = vec![0; ec_len - coeffs.len()];
    res.extend(coeffs);
    Ok(res)
}

// Number of codeword errors the blocks can correct, less the codewords reserved
// against misdecodes in the smallest symbols
pub fn error_correction_capacity(version: Version, ec_level: ECLevel) -> QRResult<usize> {
    let p = match (*version, ec_level) {
        (1, ECLevel::L) => 3,
        (2, ECLevel::L) | (1, ECLevel::M) => 2,
        (1, _) | (3, ECLevel::L) => 1,
        _ => 0,
    };

    let ec_bytes = version.rs_blocks(ec_level)?.iter().map(BlockSpec::ec_len).sum::<usize>();
    Ok((ec_bytes - p) / 2)
}

#[cfg(test)]
mod ec_tests {
    use test_case::test_case;

    use super::{ecc, ecc_per_block, error_correction_capacity};
    use crate::common::{
        ec::Poly,
        metadata::{ECLevel, Version},
        version_db::BlockSpec,
    };

    #[test]
    fn test_poly_mod_1() {
        let res = ecc_per_block(
            b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11",
            &Poly::generator(10),
            10,
        )
        .unwrap();
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res =
            ecc_per_block(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", &Poly::generator(13), 13).unwrap();
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let res =
            ecc_per_block(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", &Poly::generator(18), 18).unwrap();
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_poly_mod_zero_block() {
        let res = ecc_per_block(&[0; 9], &Poly::generator(17), 17).unwrap();
        assert_eq!(res, vec![0; 17]);
    }

    #[test]
    fn test_add_ec_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let expected_ecc = [b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17"];
        let blocks = Version::new(1).unwrap().rs_blocks(ECLevel::M).unwrap();
        let (data, ecc) = ecc(msg, &blocks).unwrap();
        assert_eq!(data, vec![&msg[..]]);
        assert_eq!(&*ecc, expected_ecc);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let blocks = Version::new(5).unwrap().rs_blocks(ECLevel::Q).unwrap();
        let (data, ecc) = ecc(msg, &blocks).unwrap();
        assert_eq!(data.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![15, 15, 16, 16]);
        assert_eq!(data[2], &msg[30..46]);
        assert_eq!(&*ecc, &expected_ec[..]);
    }

    #[test]
    fn test_blockify_mixed_sizes() {
        let blocks = [BlockSpec { total: 4, data: 2 }, BlockSpec { total: 5, data: 3 }];
        let (data, ecc) = ecc(&[1, 2, 3, 4, 5], &blocks).unwrap();
        assert_eq!(data, vec![&[1, 2][..], &[3, 4, 5][..]]);
        assert!(ecc.iter().all(|e| e.len() == 2));
    }

    #[test_case(1, ECLevel::L, 2)]
    #[test_case(1, ECLevel::H, 8)]
    #[test_case(4, ECLevel::H, 32)]
    #[test_case(40, ECLevel::L, 375)]
    fn test_error_correction_capacity(ver: usize, ecl: ECLevel, exp: usize) {
        let ver = Version::new(ver).unwrap();
        assert_eq!(error_correction_capacity(ver, ecl).unwrap(), exp);
    }
}
