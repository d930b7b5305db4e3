use log::trace;

use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Segment
//------------------------------------------------------------------------------

// Byte mode segment. Input is taken as raw bytes, any text encoding happens upstream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Segment<'a> {
    pub mode_bits: usize,
    pub len_bits: usize,
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(data: &'a [u8], ver: Version) -> Self {
        Self { mode_bits: MODE_INDICATOR_BITS, len_bits: ver.char_cnt_bits(), data }
    }

    pub fn bit_len(&self) -> usize {
        self.mode_bits + self.len_bits + (self.data.len() << 3)
    }
}


// Encoder
//------------------------------------------------------------------------------

// Encodes data as a single byte segment, then terminates and pads the stream up to
// the data codeword capacity of the version & ec level
pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
    let bcap = ver.data_bit_capacity(ecl)?;
    let seg = Segment::new(data, ver);
    let sz = seg.bit_len();
    if sz > bcap {
        return Err(QRError::DataTooLong { len: sz, capacity: bcap });
    }
    trace!("Segment of {} bytes takes {sz} of {bcap} bits", data.len());

    let mut bs = BitStream::new(bcap);
    push_segment(seg, &mut bs);
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);
    Ok(bs)
}


// Writer for encoded data
//------------------------------------------------------------------------------

fn push_segment(seg: Segment, out: &mut BitStream) {
    push_header(&seg, out);
    out.extend(seg.data);
}

fn push_header(seg: &Segment, out: &mut BitStream) {
    out.push_bits(MODE_BYTE, seg.mode_bits);
    let char_cnt = seg.data.len();
    debug_assert!(
        char_cnt < (1 << seg.len_bits),
        "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
        seg.len_bits
    );
    out.push_bits(char_cnt as u16, seg.len_bits);
}

fn push_terminator(out: &mut BitStream) {
    if out.remaining() >= TERMINATOR_BITS {
        out.push_bits(0u8, TERMINATOR_BITS);
    }
}

fn pad_remaining_capacity(out: &mut BitStream) {
    let offset = out.len() & 7;
    if offset > 0 {
        out.push_bits(0u8, 8 - offset);
    }

    let remaining_bytes = out.remaining() >> 3;
    PADDING_CODEWORDS.iter().cycle().take(remaining_bytes).for_each(|&pc| out.push_bits(pc, 8));
}


// Global constants
//------------------------------------------------------------------------------

static MODE_BYTE: u8 = 0b0100;

static MODE_INDICATOR_BITS: usize = 4;

static TERMINATOR_BITS: usize = 4;

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
