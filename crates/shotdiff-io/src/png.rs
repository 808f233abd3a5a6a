//! PNG format support.
//!
//! Every decoded image is normalized to 8-bit straight RGBA, whatever the
//! file stores:
//!
//! - Grayscale and grayscale+alpha are expanded to RGB(A)
//! - Indexed images are expanded through their palette (tRNS becomes alpha)
//! - 16-bit samples are stripped to 8 bits
//! - Missing alpha is filled with 255
//!
//! Encoding always writes 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use shotdiff_io::png;
//!
//! let image = png::read("doc/screenshots/index.png")?;
//! png::write("index_copy.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use shotdiff_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, BufRead, Seek, Write};
use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Decodes PNG bytes held in memory.
///
/// # Errors
///
/// Returns [`IoError::DecodeError`] for malformed or truncated input.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(Cursor::new(bytes))
}

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let file = File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

fn decode_from<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::UnsupportedBitDepth(format!("{:?}", info.bit_depth)));
    }

    let samples = &buf[..info.buffer_size()];
    let pixel_count = info.width as usize * info.height as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    // Rows are tightly packed for 8-bit output, so one chunk is one pixel.
    match info.color_type {
        png::ColorType::Rgba => rgba.extend_from_slice(samples),
        png::ColorType::Rgb => {
            for px in samples.chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        png::ColorType::Grayscale => {
            for &g in samples {
                rgba.extend_from_slice(&[g, g, g, 255]);
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for ga in samples.chunks_exact(2) {
                rgba.extend_from_slice(&[ga[0], ga[0], ga[0], ga[1]]);
            }
        }
        color_type => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                color_type, info.bit_depth
            )));
        }
    }

    trace!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "png::decode"
    );

    Ok(Image::from_raw(info.width, info.height, rgba)?)
}

/// Encodes an image as an 8-bit RGBA PNG in memory.
pub fn encode(image: &Image) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(&mut out, image)?;
    Ok(out)
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode_to(&mut writer, image)?;
    writer.flush()?;
    debug!(path = %path.as_ref().display(), "png::write");
    Ok(())
}

fn encode_to<W: Write>(writer: W, image: &Image) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.as_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotdiff_core::Pixel;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
        out
    }

    #[test]
    fn test_roundtrip_rgba() {
        let mut image = Image::filled(16, 8, Pixel::rgba(10, 20, 30, 40));
        image.set_pixel(15, 7, Pixel::RED);

        let bytes = encode(&image).expect("Failed to encode PNG");
        let loaded = decode(&bytes).expect("Failed to decode PNG");

        assert_eq!(loaded, image);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), Pixel::rgba(1, 2, 3, 255));
        assert_eq!(img.pixel(1, 0), Pixel::rgba(4, 5, 6, 255));
    }

    #[test]
    fn test_grayscale_alpha_expands() {
        let bytes = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, &[77, 128]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), Pixel::rgba(77, 77, 77, 128));
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        let err = decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    #[test]
    fn test_truncated_input_is_decode_error() {
        let bytes = encode(&Image::filled(8, 8, Pixel::WHITE)).unwrap();
        let err = decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let image = Image::filled(5, 3, Pixel::BLACK);

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded, image);
    }
}
