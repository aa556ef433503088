//! TrueType text rasterization using fontdue (pure Rust)

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::font_discovery::find_font_path;

/// Coverage mask of rendered text (0 = transparent, 255 = fully covered)
pub struct RenderedText {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

impl RenderedText {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }
}

/// Font renderer using fontdue
#[derive(Debug)]
pub struct FontRenderer {
    font: Font,
    size: f32,
}

impl FontRenderer {
    /// Load a TrueType font from a file path
    pub fn from_path(path: PathBuf, size: f32) -> Result<Self> {
        let font_data = fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font: {}", e))?;

        Ok(Self { font, size })
    }

    /// Resolve `family` through fontconfig, falling back to common system fonts
    pub fn load(family: &str, size: f32) -> Result<Self> {
        match find_font_path(family).and_then(|path| Self::from_path(path, size)) {
            Ok(renderer) => return Ok(renderer),
            Err(e) => warn!(family, error = ?e, "Configured font unavailable, trying fallbacks"),
        }
        Self::from_system_font(size)
    }

    /// Try to find and load a common system font
    pub fn from_system_font(size: f32) -> Result<Self> {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        ];

        for path in &font_paths {
            if let Ok(renderer) = Self::from_path(PathBuf::from(path), size) {
                debug!(path, "Loaded fallback font");
                return Ok(renderer);
            }
        }

        Err(anyhow::anyhow!(
            "Could not find any system fonts. Tried fontconfig and hardcoded paths: {:?}",
            font_paths
        ))
    }

    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.size).advance_width
    }

    fn line_width(&self, line: &str) -> f32 {
        line.chars().map(|ch| self.advance(ch)).sum()
    }

    /// Greedy word wrap to `max_width`; words wider than a line stay whole
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if !current.is_empty() && self.line_width(&candidate) > max_width {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Render wrapped, horizontally centred lines into a coverage mask
    pub fn render_block(&self, text: &str, max_width: f32) -> RenderedText {
        let lines = self.wrap(text, max_width);
        if lines.iter().all(|l| l.is_empty()) {
            return RenderedText::empty();
        }

        let (ascent, line_height) = match self.font.horizontal_line_metrics(self.size) {
            Some(m) => (m.ascent, m.new_line_size),
            None => (self.size, self.size * 1.2),
        };

        let width = lines
            .iter()
            .map(|l| self.line_width(l).ceil() as usize)
            .max()
            .unwrap_or(0);
        let height = (line_height * lines.len() as f32).ceil() as usize;
        if width == 0 || height == 0 {
            return RenderedText::empty();
        }

        let mut coverage = vec![0u8; width * height];

        for (row, line) in lines.iter().enumerate() {
            let offset_x = (width as f32 - self.line_width(line)) / 2.0;
            let baseline = row as f32 * line_height + ascent;
            let mut pen_x = offset_x;

            for ch in line.chars() {
                let (metrics, bitmap) = self.font.rasterize(ch, self.size);
                // Glyph top edge relative to the baseline
                let top = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
                let left = (pen_x + metrics.xmin as f32).round() as i32;

                for gy in 0..metrics.height {
                    for gx in 0..metrics.width {
                        let px = left + gx as i32;
                        let py = top + gy as i32;
                        if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                            continue;
                        }
                        let idx = py as usize * width + px as usize;
                        coverage[idx] = coverage[idx].max(bitmap[gy * metrics.width + gx]);
                    }
                }
                pen_x += metrics.advance_width;
            }
        }

        RenderedText {
            width,
            height,
            coverage,
        }
    }
}
