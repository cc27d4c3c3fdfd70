//! Faucet captcha handling: SVG size check and conversion to a bitmap.

mod converter;
mod svg;

pub use converter::{ImageConverter, DEFAULT_CONVERTER};
pub use svg::{check_svg_dimensions, CAPTCHA_HEIGHT, CAPTCHA_WIDTH};

use crate::ascii::{PixelGrid, PixelGridError};

/// Errors that can occur while preparing a captcha for display.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("Captcha is not an SVG document")]
    NotSvg,

    #[error("Captcha size doesn't match expected dimensions 150x50 (got width={width:?}, height={height:?})")]
    Dimensions {
        width: Option<String>,
        height: Option<String>,
    },

    #[error("The binary {program} could not be found. Please make sure ImageMagick (or a compatible fork) is installed and that the correct path is specified.")]
    ConverterNotFound { program: String },

    #[error("{program} exited with {status}: {stderr}")]
    ConverterFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Image(#[from] PixelGridError),
}

/// Validate an SVG captcha, convert it and decode the result.
pub fn prepare(svg: &[u8], converter: &ImageConverter) -> Result<PixelGrid, ChallengeError> {
    check_svg_dimensions(svg)?;
    let ppm = converter.to_ppm(svg)?;
    Ok(PixelGrid::decode(&ppm)?)
}
