//! Binary PPM (`P6`) decoding into an immutable pixel grid.
//!
//! Only the exact layout produced by ImageMagick for the faucet captcha is
//! accepted: a `P6` magic line, a `<width> <height>` line, a `255` depth line,
//! then `width * height * 3` bytes of row-major RGB data. Comment lines and
//! 16-bit depths are rejected.

/// An RGB triple.
pub type Rgb = [u8; 3];

/// Bytes per pixel in a `P6` image with depth 255.
const BYTES_PER_PIXEL: usize = 3;

/// Errors produced while decoding or indexing a [`PixelGrid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelGridError {
    /// The byte buffer is not a well-formed `P6` image.
    #[error("Invalid ppm format: {0}")]
    Format(&'static str),

    /// A lookup fell outside the grid.
    #[error("Pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A decoded RGB image. Construct it with [`PixelGrid::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Decode a binary PPM buffer.
    ///
    /// The header is validated line by line and the pixel payload must be
    /// complete; on any failure no grid is produced. Bytes after the payload
    /// are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, PixelGridError> {
        let (magic, rest) =
            split_line(bytes).ok_or(PixelGridError::Format("bad magic"))?;
        if magic != b"P6" {
            return Err(PixelGridError::Format("bad magic"));
        }

        let (dims, rest) =
            split_line(rest).ok_or(PixelGridError::Format("bad dimensions"))?;
        let (width, height) =
            parse_dimensions(dims).ok_or(PixelGridError::Format("bad dimensions"))?;

        let (depth, rest) =
            split_line(rest).ok_or(PixelGridError::Format("bad color depth"))?;
        if depth != b"255" {
            return Err(PixelGridError::Format("bad color depth"));
        }

        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(PixelGridError::Format("bad dimensions"))?;
        if rest.len() < len {
            return Err(PixelGridError::Format("truncated pixel data"));
        }

        log::debug!("Decoded {}x{} ppm image", width, height);

        Ok(Self {
            width,
            height,
            data: rest[..len].to_vec(),
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Look up the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgb, PixelGridError> {
        self.get(x, y).ok_or(PixelGridError::IndexOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Like [`PixelGrid::pixel`], but `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.width * BYTES_PER_PIXEL;
        let idx = stride * y + BYTES_PER_PIXEL * x;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }
}

/// Split off one `\n`-terminated line. `None` if there is no newline.
fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == b'\n')?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn parse_dimensions(line: &[u8]) -> Option<(usize, usize)> {
    let line = std::str::from_utf8(line).ok()?;
    let mut tokens = line.split_ascii_whitespace();
    let width = tokens.next()?.parse::<usize>().ok()?;
    let height = tokens.next()?.parse::<usize>().ok()?;
    if tokens.next().is_some() || width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
