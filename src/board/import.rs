//! Image import for the board editor
//!
//! Picked files are read and decoded on a background thread; the UI loop
//! polls for finished imports and adds them to the board.

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{error, info};

/// A decoded image ready to be placed on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedImage {
    pub source: PathBuf,
    pub data_uri: String,
}

/// Outcome of one background import
pub type ImportResult = std::result::Result<ImportedImage, String>;

pub struct ImageImporter {
    sender: Sender<ImportResult>,
    receiver: Receiver<ImportResult>,
    pending: usize,
}

impl Default for ImageImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageImporter {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Number of imports still being read/decoded
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start reading `path` in the background
    pub fn import(&mut self, path: PathBuf) -> Result<()> {
        let sender = self.sender.clone();
        thread::Builder::new()
            .name("image-import".to_string())
            .spawn(move || {
                let result = load_data_uri(&path)
                    .map(|data_uri| ImportedImage {
                        source: path.clone(),
                        data_uri,
                    })
                    .map_err(|e| {
                        error!(path = %path.display(), error = ?e, "Image import failed");
                        format!("{e:#}")
                    });
                // Receiver gone means the editor closed; nothing to deliver to
                let _ = sender.send(result);
            })
            .context("Failed to spawn image import thread")?;
        self.pending += 1;
        Ok(())
    }

    /// Collect every import finished since the last poll (non-blocking)
    pub fn poll(&mut self) -> Vec<ImportResult> {
        let mut finished = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(result) => {
                    self.pending = self.pending.saturating_sub(1);
                    finished.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }

    /// Block until the next import finishes
    #[cfg(test)]
    fn wait(&mut self) -> ImportResult {
        let result = self
            .receiver
            .recv_timeout(std::time::Duration::from_secs(10))
            .map_err(|e| e.to_string())?;
        self.pending = self.pending.saturating_sub(1);
        result
    }
}

/// Read an image file fully and encode it as a data URI
pub fn load_data_uri(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;
    let data_uri = to_data_uri(&bytes)
        .with_context(|| format!("Unsupported image file: {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Imported image");
    Ok(data_uri)
}

/// Validate `bytes` as a decodable image and wrap them in a data URI
pub fn to_data_uri(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes).context("Unrecognized image format")?;
    image::load_from_memory_with_format(bytes, format).context("Failed to decode image")?;
    let mime = format.to_mime_type();
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Decode the payload of a base64 data URI
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let (header, payload) = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| anyhow!("Not a data URI"))?;
    if !header.ends_with(";base64") {
        return Err(anyhow!("Data URI is not base64 encoded: {header}"));
    }
    STANDARD
        .decode(payload.trim())
        .context("Failed to decode base64 payload")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// 2x2 RGBA PNG encoded with the png crate
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 2);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer
                .write_image_data(&[
                    255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255,
                ])
                .unwrap();
        }
        out
    }

    #[test]
    fn test_data_uri_round_trips_bytes() {
        let png = tiny_png();
        let uri = to_data_uri(&png).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), png);
    }

    #[test]
    fn test_rejects_non_images() {
        assert!(to_data_uri(b"definitely not an image").is_err());
        assert!(decode_data_uri("#e0f2fe").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
    }

    #[test]
    fn test_background_import() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&tiny_png()).unwrap();

        let mut importer = ImageImporter::new();
        importer.import(file.path().to_path_buf()).unwrap();
        assert_eq!(importer.pending(), 1);

        let imported = importer.wait().unwrap();
        assert_eq!(imported.source, file.path());
        assert!(imported.data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(importer.pending(), 0);
    }

    #[test]
    fn test_background_import_missing_file() {
        let mut importer = ImageImporter::new();
        importer.import(PathBuf::from("/definitely/missing/picture.png")).unwrap();
        let err = importer.wait().unwrap_err();
        assert!(err.contains("Failed to read image file"), "{err}");
    }

    #[test]
    fn test_picker_extensions_are_decodable() {
        for ext in crate::constants::board::IMPORT_EXTENSIONS {
            let format = image::ImageFormat::from_extension(ext)
                .unwrap_or_else(|| panic!("{ext} should map to an image format"));
            assert!(format.reading_enabled(), "{ext} decoding should be compiled in");
        }
    }
}
