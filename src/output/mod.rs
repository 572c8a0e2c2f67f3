//! Frame file I/O.

mod png_io;

pub use png_io::{PngDecoder, PngEncoder};
