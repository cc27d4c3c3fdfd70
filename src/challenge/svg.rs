//! Size check on the root `<svg>` element of a captcha.

use std::sync::OnceLock;

use regex::Regex;

use super::ChallengeError;

/// Expected captcha width attribute.
pub const CAPTCHA_WIDTH: &str = "150";

/// Expected captcha height attribute.
pub const CAPTCHA_HEIGHT: &str = "50";

fn svg_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // First element after any prolog, doctype or comments must be <svg ...>.
        // Quoted attribute values may contain '>'.
        Regex::new(
            r#"^\s*(?:<\?[^>]*\?>\s*|<!--(?s:.*?)-->\s*|<!DOCTYPE[^>]*>\s*)*<svg\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
        )
        .expect("valid svg tag regex")
    })
}

fn attribute_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?:^|\s){}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        regex::escape(name)
    ))
    .expect("valid svg attribute regex")
}

fn width_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute_regex("width"))
}

fn height_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute_regex("height"))
}

fn attribute(attrs: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Require the root `<svg>` element to declare `width="150" height="50"`.
pub fn check_svg_dimensions(svg: &[u8]) -> Result<(), ChallengeError> {
    let text = std::str::from_utf8(svg).map_err(|_| ChallengeError::NotSvg)?;
    let attrs = svg_tag()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(ChallengeError::NotSvg)?
        .as_str();

    let width = attribute(attrs, width_attr());
    let height = attribute(attrs, height_attr());
    if width.as_deref() != Some(CAPTCHA_WIDTH) || height.as_deref() != Some(CAPTCHA_HEIGHT) {
        return Err(ChallengeError::Dimensions { width, height });
    }
    Ok(())
}
