//! fbink-io - Image I/O for fbink
//!
//! Decodes PNG files into [`fbink_core::Bitmap`]s in the layout the
//! renderer asks for, and encodes bitmaps back to PNG.

mod error;
pub mod png;

pub use error::{IoError, IoResult};
pub use self::png::{decode_png, encode_png, read_png, read_png_file, write_png, write_png_file};
