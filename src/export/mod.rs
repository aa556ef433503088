//! Board export: rasterize the visible board surface and save it as PNG

pub mod font;
mod font_discovery;

use image::imageops::{self, FilterType};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::import::decode_data_uri;
use crate::board::{BoardItem, ItemKind};
use crate::color::HexColor;
use crate::constants::{board, export};
use font::FontRenderer;

/// Largest side of an intermediate item raster; bigger items are sampled down
const MAX_LAYER_SIDE: u32 = 4096;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render board: {0}")]
    Render(String),
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub dir: PathBuf,
    pub font_family: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: board::SURFACE_WIDTH,
            height: board::SURFACE_HEIGHT,
            dir: default_export_dir(),
            font_family: export::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// Downloads directory, else the working directory
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// RGBA8 pixel buffer, straight alpha
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: color.repeat(count),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    fn set(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Source-over blend
    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let sa = src[3] as f32 / 255.0;
        if sa <= 0.0 {
            return;
        }
        let dst = self.pixel(x, y);
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| {
            let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        self.set(
            x,
            y,
            [
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                (out_a * 255.0).round() as u8,
            ],
        );
    }
}

/// Render `items` (already in paint order) over the board background
pub fn render_board(
    items: &[&BoardItem],
    width: u32,
    height: u32,
    font: Option<&FontRenderer>,
) -> Result<Raster, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::Render(format!(
            "board surface has no area ({width}x{height})"
        )));
    }
    let mut canvas = Raster::filled(width, height, export::BACKGROUND);

    for item in items {
        let Some(layer) = rasterize_item(item, font)? else {
            continue;
        };
        composite(&mut canvas, item, &layer);
    }
    Ok(canvas)
}

/// Item content at item resolution (capped), before rotation
fn rasterize_item(item: &BoardItem, font: Option<&FontRenderer>) -> Result<Option<Raster>, ExportError> {
    let (w, h) = layer_size(item);
    if w == 0 || h == 0 {
        return Ok(None);
    }

    match item.kind {
        ItemKind::Color => match HexColor::parse(&item.content) {
            Some(color) => Ok(Some(Raster::filled(w, h, color.rgba()))),
            None => {
                warn!(id = %item.id, content = %item.content, "Skipping color block with invalid color");
                Ok(None)
            }
        },
        ItemKind::Text => Ok(Some(text_layer(&item.content, w, h, font))),
        ItemKind::Image => image_layer(item, w, h).map(Some),
    }
}

fn layer_size(item: &BoardItem) -> (u32, u32) {
    let side = |v: f32| {
        if v.is_finite() && v >= 1.0 {
            (v.round() as u32).min(MAX_LAYER_SIDE)
        } else {
            0
        }
    };
    (side(item.size.width), side(item.size.height))
}

fn text_layer(content: &str, w: u32, h: u32, font: Option<&FontRenderer>) -> Raster {
    let mut layer = Raster::filled(w, h, export::TEXT_PANEL);
    let Some(font) = font else {
        return layer;
    };

    let text = font.render_block(content, w as f32 - export::TEXT_PADDING * 2.0);
    if text.width == 0 {
        return layer;
    }
    let rgb = [
        ((export::TEXT_COLOR >> 16) & 0xFF) as u8,
        ((export::TEXT_COLOR >> 8) & 0xFF) as u8,
        (export::TEXT_COLOR & 0xFF) as u8,
    ];
    let alpha = ((export::TEXT_COLOR >> 24) & 0xFF) as f32 / 255.0;
    let offset_x = (w as i64 - text.width as i64) / 2;
    let offset_y = (h as i64 - text.height as i64) / 2;

    for ty in 0..text.height {
        for tx in 0..text.width {
            let coverage = text.coverage[ty * text.width + tx];
            if coverage == 0 {
                continue;
            }
            let x = offset_x + tx as i64;
            let y = offset_y + ty as i64;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                continue;
            }
            let a = (coverage as f32 * alpha).round() as u8;
            layer.blend(x as u32, y as u32, [rgb[0], rgb[1], rgb[2], a]);
        }
    }
    layer
}

/// Decode the item's data URI and scale it to cover the item, cropping overflow
fn image_layer(item: &BoardItem, w: u32, h: u32) -> Result<Raster, ExportError> {
    let bytes = decode_data_uri(&item.content)
        .map_err(|e| ExportError::Render(format!("image item '{}': {e:#}", item.id)))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| ExportError::Render(format!("image item '{}': {e}", item.id)))?
        .to_rgba8();
    let (iw, ih) = decoded.dimensions();
    if iw == 0 || ih == 0 {
        return Err(ExportError::Render(format!("image item '{}' is empty", item.id)));
    }

    let scale = (w as f32 / iw as f32).max(h as f32 / ih as f32);
    let crop_w = ((w as f32 / scale).round() as u32).clamp(1, iw);
    let crop_h = ((h as f32 / scale).round() as u32).clamp(1, ih);
    let cropped = imageops::crop_imm(&decoded, (iw - crop_w) / 2, (ih - crop_h) / 2, crop_w, crop_h).to_image();
    let scaled = imageops::resize(&cropped, w, h, FilterType::Triangle);

    Ok(Raster {
        width: w,
        height: h,
        pixels: scaled.into_raw(),
    })
}

/// Paint `layer` onto `canvas` at the item's position, rotated about its centre
fn composite(canvas: &mut Raster, item: &BoardItem, layer: &Raster) {
    let (w, h) = (item.size.width, item.size.height);
    let center = item.center();
    let (sin, cos) = item.rotation.to_radians().sin_cos();

    let half_w = (w / 2.0 * cos).abs() + (h / 2.0 * sin).abs();
    let half_h = (w / 2.0 * sin).abs() + (h / 2.0 * cos).abs();
    let x0 = (center.x - half_w).floor().max(0.0) as u32;
    let y0 = (center.y - half_h).floor().max(0.0) as u32;
    let x1 = ((center.x + half_w).ceil().max(0.0) as u32).min(canvas.width);
    let y1 = ((center.y + half_h).ceil().max(0.0) as u32).min(canvas.height);

    let sx = layer.width as f32 / w;
    let sy = layer.height as f32 / h;

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            // Inverse rotation back into item-local space
            let u = dx * cos + dy * sin + w / 2.0;
            let v = -dx * sin + dy * cos + h / 2.0;
            if u < 0.0 || v < 0.0 || u >= w || v >= h {
                continue;
            }
            let lx = ((u * sx) as u32).min(layer.width - 1);
            let ly = ((v * sy) as u32).min(layer.height - 1);
            canvas.blend(px, py, layer.pixel(lx, ly));
        }
    }
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, raster.width, raster.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raster.pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Render the board and write `moodboard.png` into `options.dir`
pub fn export_snapshot(items: &[&BoardItem], options: &ExportOptions) -> Result<PathBuf, ExportError> {
    let font = match FontRenderer::load(&options.font_family, export::TEXT_SIZE) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = ?e, "No font available, text items export without glyphs");
            None
        }
    };

    let raster = render_board(items, options.width, options.height, font.as_ref())?;
    let png = encode_png(&raster)?;
    let path = write_export(&options.dir, &png)?;
    info!(path = %path.display(), items = items.len(), bytes = png.len(), "Exported mood board");
    Ok(path)
}

fn write_export(dir: &Path, png: &[u8]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export::FILE_NAME);
    fs::write(&path, png).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "Wrote export file");
    Ok(path)
}
