//! PNG encoding and decoding of frames.
//!
//! Pure Rust, using the `png` crate. Annotated frames are written as 8-bit
//! RGBA; backgrounds of any 8/16-bit color type are read and widened to RGBA.

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Writes frames as PNG.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a frame to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        let file = File::create(path)?;
        Self::encode(fb, BufWriter::new(file))
    }

    /// Encode a frame to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode(fb, &mut buffer)?;
        Ok(buffer)
    }

    fn encode<W: Write>(fb: &Framebuffer, sink: W) -> Result<()> {
        let mut encoder = png::Encoder::new(sink, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        // Stride padding must not reach the file.
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }
}

/// Reads PNG images into frames.
pub struct PngDecoder;

impl PngDecoder {
    /// Read a PNG file into a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Framebuffer> {
        let file = File::open(path)?;
        Self::decode(BufReader::new(file))
    }

    /// Decode PNG bytes into a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a decodable PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Framebuffer> {
        Self::decode(bytes)
    }

    fn decode<R: Read>(source: R) -> Result<Framebuffer> {
        let mut decoder = png::Decoder::new(source);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let data = &buf[..info.buffer_size()];
        let (width, height) = (info.width, info.height);

        match info.color_type {
            png::ColorType::Rgba => Framebuffer::from_rgba(width, height, data),
            png::ColorType::Rgb => Framebuffer::from_rgb(width, height, data),
            png::ColorType::Grayscale => {
                let rgb: Vec<u8> = data.iter().flat_map(|&v| [v, v, v]).collect();
                Framebuffer::from_rgb(width, height, &rgb)
            }
            png::ColorType::GrayscaleAlpha => {
                let rgba: Vec<u8> = data
                    .chunks_exact(2)
                    .flat_map(|px| [px[0], px[0], px[0], px[1]])
                    .collect();
                Framebuffer::from_rgba(width, height, &rgba)
            }
            png::ColorType::Indexed => Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "palette image was not expanded",
            ))),
        }
    }
}
