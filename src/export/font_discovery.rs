//! Font discovery via fontconfig
//!
//! Resolve the configured font name for board text to a font file path

use anyhow::{Context, Result};
use fontconfig::{Fontconfig, Pattern};
use std::ffi::CString;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Style suffixes recognised at the end of a font name
/// Longer names come first so "SemiBold Italic" wins over "Bold Italic"
const KNOWN_STYLES: &[&str] = &[
    "SemiBold Italic",
    "Bold Italic",
    "Light Italic",
    "SemiBold",
    "Italic",
    "Bold",
    "Light",
    "Medium",
    "Regular",
];

/// Split "Family Style" into family and optional style
pub fn split_style(font_name: &str) -> (&str, Option<&'static str>) {
    for style in KNOWN_STYLES {
        if let Some(prefix) = font_name.strip_suffix(*style)
            && (prefix.is_empty() || prefix.ends_with(' '))
        {
            return (prefix.trim(), Some(*style));
        }
    }
    (font_name.trim(), None)
}

/// Find the font file for a family name or "Family Style" name
pub fn find_font_path(font_name: &str) -> Result<PathBuf> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
    let (family_name, style_name) = split_style(font_name);

    let mut pattern = Pattern::new(&fc);
    let family_cstr = CString::new(family_name)
        .with_context(|| format!("Invalid family name: {}", family_name))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

    if let Some(style) = style_name {
        let style_cstr =
            CString::new(style).with_context(|| format!("Invalid style name: {}", style))?;
        pattern.add_string(fontconfig::FC_STYLE, &style_cstr);
    }

    let matched = pattern.font_match();

    // fontconfig falls back to some other family when the requested one is missing
    if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY)
        && !matched_family.eq_ignore_ascii_case(family_name)
    {
        warn!(
            requested = font_name,
            matched_family, "Fontconfig returned a different font family"
        );
        return Err(anyhow::anyhow!(
            "Font '{}' not found - fontconfig returned family '{}' instead",
            font_name,
            matched_family
        ));
    }

    let path = PathBuf::from(
        matched
            .filename()
            .with_context(|| format!("No font file found for '{}'", font_name))?,
    );
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Font file path '{}' does not exist",
            path.display()
        ));
    }

    debug!(font = font_name, path = %path.display(), "Resolved font path");
    Ok(path)
}
