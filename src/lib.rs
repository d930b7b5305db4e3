//! # qrcraft
//!
//! A Rust library for encoding byte payloads into QR code symbols with Reed-Solomon
//! error correction. The caller picks the version and error correction level, and the
//! builder produces the module matrix, choosing the mask pattern by penalty score.
//!
//! ## Features
//!
//! - **Byte Mode Encoding**: Single segment payloads, from raw bytes or text in any encoding
//! - **Reed-Solomon Error Correction**: Interleaved blocks at levels L, M, Q and H
//! - **Mask Selection**: All 8 masks scored by penalty, lowest score wins
//! - **Module Queries**: Per module darkness lookups for rasterizing the symbol however you like
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrcraft::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Version 4 at level H unless configured otherwise
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! for r in 0..qr.width() as i32 {
//!     let row = (0..qr.width() as i32)
//!         .map(|c| qr.is_dark(r, c).map(|d| if d { '#' } else { ' ' }))
//!         .collect::<Result<String, _>>()?;
//!     println!("{row}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrcraft::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::from_text("Grüße", encoding_rs::UTF_8)?
//!     .version(Version::new(2)?)     // QR version (size), never upgraded when data overflows
//!     .ec_level(ECLevel::M)          // Error correction level - defaults to ECLevel::H
//!     .mask(MaskPattern::new(3)?)    // Mask pattern - if not provided, finds best mask by penalty
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! # Ok(())
//! # }
//! ```
//!
//! ### Choosing a Version
//!
//! ```rust
//! use qrcraft::{ECLevel, QRBuilder, QRError, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = [b'x'; 100];
//! let res = QRBuilder::new(&data).version(Version::new(4)?).ec_level(ECLevel::Q).build();
//! assert!(matches!(res, Err(QRError::DataTooLong { .. })));
//!
//! // Capacity queries help pick a version up front
//! let ver = (1..=40)
//!     .filter_map(|v| Version::new(v).ok())
//!     .find(|v| v.data_codewords(ECLevel::Q).map_or(false, |cap| cap >= 102));
//! assert_eq!(ver.map(|v| *v), Some(8));
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;

pub use builder::{error_correction_capacity, Module, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::{compute_total_penalty, MaskPattern};
pub use common::metadata::{Color, ECLevel, Version};
pub use common::version_db::BlockSpec;
