//! PNG image format support
//!
//! Decoding always produces 8-bit samples: palettes and sub-byte gray are
//! expanded, 16-bit samples are stripped to their high byte, and a `tRNS`
//! chunk becomes a real alpha channel. RGB images are widened to opaque
//! RGBA, since 24-bit pixels are not a [`PixelLayout`].

use crate::{IoError, IoResult};
use fbink_core::{Bitmap, PixelLayout};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Read a PNG image
///
/// # Arguments
/// * `reader` - PNG stream
/// * `layout` - Layout to convert to, or `None` for the image's own
///   (gray, gray + alpha, or RGBA)
pub fn read_png<R: BufRead + Seek>(reader: R, layout: Option<PixelLayout>) -> IoResult<Bitmap> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;
    let data = &buf[..output_info.buffer_size()];

    let bitmap = match (output_info.color_type, output_info.bit_depth) {
        (ColorType::Grayscale, BitDepth::Eight) => {
            Bitmap::from_data(width, height, PixelLayout::Gray, data)?
        }
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => {
            Bitmap::from_data(width, height, PixelLayout::GrayAlpha, data)?
        }
        (ColorType::Rgb, BitDepth::Eight) => Bitmap::from_rgb24(width, height, data)?,
        (ColorType::Rgba, BitDepth::Eight) => {
            Bitmap::from_data(width, height, PixelLayout::Rgba, data)?
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG format after expansion: {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    match layout {
        Some(layout) if layout != bitmap.layout() => Ok(bitmap.to_layout(layout)?),
        _ => Ok(bitmap),
    }
}

/// Read a PNG file
pub fn read_png_file<P: AsRef<Path>>(path: P, layout: Option<PixelLayout>) -> IoResult<Bitmap> {
    let file = File::open(path)?;
    read_png(BufReader::new(file), layout)
}

/// Decode a PNG image held in memory
pub fn decode_png(data: &[u8], layout: Option<PixelLayout>) -> IoResult<Bitmap> {
    read_png(Cursor::new(data), layout)
}

/// Write a PNG image
pub fn write_png<W: Write>(bitmap: &Bitmap, writer: W) -> IoResult<()> {
    let color_type = match bitmap.layout() {
        PixelLayout::Gray => ColorType::Grayscale,
        PixelLayout::GrayAlpha => ColorType::GrayscaleAlpha,
        PixelLayout::Rgba => ColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, bitmap.width(), bitmap.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    // Bitmaps are unpadded 8-bit rows, which is exactly PNG's layout.
    writer
        .write_image_data(bitmap.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

/// Write a PNG file
pub fn write_png_file<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_png(bitmap, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Encode a bitmap as PNG in memory
pub fn encode_png(bitmap: &Bitmap) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(bitmap, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_gray() {
        let data: Vec<u8> = (0..100u32).map(|i| (i * 2) as u8).collect();
        let bmp = Bitmap::from_data(10, 10, PixelLayout::Gray, &data).unwrap();

        let encoded = encode_png(&bmp).unwrap();
        let decoded = decode_png(&encoded, None).unwrap();

        assert_eq!(decoded, bmp);
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let mut bmp = Bitmap::new(5, 5, PixelLayout::Rgba).unwrap();
        bmp.set_pixel(0, 0, &[255, 0, 0, 255]).unwrap();
        bmp.set_pixel(1, 1, &[0, 255, 0, 128]).unwrap();
        bmp.set_pixel(2, 2, &[0, 0, 255, 0]).unwrap();

        let decoded = decode_png(&encode_png(&bmp).unwrap(), None).unwrap();

        assert_eq!(decoded.pixel(0, 0), Some(&[255, 0, 0, 255][..]));
        assert_eq!(decoded.pixel(1, 1), Some(&[0, 255, 0, 128][..]));
        assert_eq!(decoded.pixel(2, 2), Some(&[0, 0, 255, 0][..]));
    }

    #[test]
    fn test_rgb_widened_to_rgba() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        }

        let decoded = decode_png(&buffer, None).unwrap();
        assert_eq!(decoded.layout(), PixelLayout::Rgba);
        assert_eq!(decoded.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);

        let gray = decode_png(&buffer, Some(PixelLayout::Gray)).unwrap();
        assert_eq!(gray.layout(), PixelLayout::Gray);
    }

    #[test]
    fn test_sixteen_bit_stripped() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Sixteen);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0x12, 0x34, 0xab, 0xcd]).unwrap();
        }

        let decoded = decode_png(&buffer, None).unwrap();
        assert_eq!(decoded.data(), &[0x12, 0xab]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_png(b"not a png", None),
            Err(IoError::DecodeError(_))
        ));
    }
}
