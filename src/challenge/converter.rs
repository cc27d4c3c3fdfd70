//! ImageMagick bridge: SVG on stdin, binary PPM on stdout.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use super::ChallengeError;

/// Default converter program (ImageMagick 6 name; `magick` works too).
pub const DEFAULT_CONVERTER: &str = "convert";

/// Runs an ImageMagick-compatible converter.
#[derive(Debug, Clone)]
pub struct ImageConverter {
    program: String,
    args: Vec<String>,
}

impl Default for ImageConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

impl ImageConverter {
    /// Use `program svg:- -depth 8 ppm:-`, so the PPM maxval is always 255.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: ["svg:-", "-depth", "8", "ppm:-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Use a program with explicit arguments. It must read the image from
    /// stdin and write a binary PPM to stdout.
    pub fn with_args(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Convert an SVG document to binary PPM bytes.
    pub fn to_ppm(&self, svg: &[u8]) -> Result<Vec<u8>, ChallengeError> {
        log::debug!("Converting captcha with {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ChallengeError::ConverterNotFound {
                        program: self.program.clone(),
                    }
                } else {
                    self.io_error(e)
                }
            })?;

        // Feed stdin from a thread so a large output can't deadlock us
        let stdin = child.stdin.take();
        let input = svg.to_vec();
        let writer = thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&input)?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| self.io_error(e))?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The converter may exit before reading everything; its status decides
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(self.io_error(e)),
            Err(_) => {
                return Err(self.io_error(std::io::Error::other("stdin writer panicked")));
            }
        }

        if !output.status.success() {
            return Err(ChallengeError::ConverterFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    fn io_error(&self, source: std::io::Error) -> ChallengeError {
        ChallengeError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        assert_eq!(ImageConverter::default().program(), "convert");
    }

    #[test]
    fn test_default_args_force_eight_bit_output() {
        let converter = ImageConverter::new("magick");
        assert_eq!(converter.args(), ["svg:-", "-depth", "8", "ppm:-"]);
    }

    #[test]
    fn test_not_found() {
        let converter = ImageConverter::new("getcoins-test-no-such-convert");
        let err = converter.to_ppm(b"<svg/>").unwrap_err();
        assert!(matches!(err, ChallengeError::ConverterNotFound { .. }));
        assert!(err.to_string().contains("could not be found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_reports_stderr() {
        let converter = ImageConverter::with_args(
            "sh",
            vec!["-c".into(), "cat >/dev/null; echo 'no delegate' >&2; exit 1".into()],
        );
        match converter.to_ppm(b"<svg/>").unwrap_err() {
            ChallengeError::ConverterFailed { stderr, .. } => assert_eq!(stderr, "no delegate"),
            other => panic!("Expected ConverterFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_returned() {
        let converter = ImageConverter::with_args(
            "sh",
            vec!["-c".into(), "cat >/dev/null; printf 'P6\\n1 1\\n255\\nabc'".into()],
        );
        assert_eq!(converter.to_ppm(b"<svg/>").unwrap(), b"P6\n1 1\n255\nabc".to_vec());
    }
}
