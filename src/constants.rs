//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Mood board item defaults
pub mod board {
    /// Smallest width or height an item can be resized to (pixels)
    pub const MIN_ITEM_SIZE: f32 = 50.0;

    /// Default placement and size for imported images
    pub const IMAGE_POSITION: (f32, f32) = (100.0, 100.0);
    pub const IMAGE_SIZE: (f32, f32) = (200.0, 150.0);

    /// Default placement and size for text items
    pub const TEXT_POSITION: (f32, f32) = (150.0, 150.0);
    pub const TEXT_SIZE: (f32, f32) = (200.0, 50.0);

    /// Placeholder shown on a freshly added text item
    pub const TEXT_PLACEHOLDER: &str = "Double click to edit";

    /// Default placement and size for color blocks
    pub const COLOR_POSITION: (f32, f32) = (200.0, 200.0);
    pub const COLOR_SIZE: (f32, f32) = (100.0, 100.0);

    /// Color blocks sit behind everything else
    pub const COLOR_Z_INDEX: i32 = 0;

    /// Paint order override for the item currently being dragged
    pub const ACTIVE_Z_INDEX: i32 = 100;

    /// File extensions offered by the image picker
    pub const IMPORT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

    /// Palette color blocks are picked from (blue, pink, violet 50/100/200)
    pub const COLOR_PALETTE: [&str; 9] = [
        "#f0f9ff", "#e0f2fe", "#bae6fd", "#fdf2f8", "#fce7f3", "#fbcfe8", "#f5f3ff", "#ede9fe",
        "#ddd6fe",
    ];

    /// Visible board surface
    pub const SURFACE_WIDTH: u32 = 800;
    pub const SURFACE_HEIGHT: u32 = 500;
}

/// Durable storage constants
pub mod storage {
    /// Key the whole store is written under
    pub const STORE_KEY: &str = "moodmuse-storage";

    /// Directory name under the platform data directory
    pub const APP_DIR: &str = "moodmuse";

    /// Extension of the file backing each storage key
    pub const FILE_EXTENSION: &str = "json";
}

/// Config file location
pub mod config {
    /// Directory name under the platform config directory
    pub const APP_DIR: &str = "moodmuse";

    /// Config file name
    pub const FILENAME: &str = "config.json";
}

/// Timing constants
pub mod timing {
    /// Simulated latency of tracker and journal saves
    pub const SAVE_DELAY_MS: u64 = 500;

    /// How long a notification stays on screen
    pub const NOTIFICATION_TTL_MS: u64 = 4000;
}

/// Mood scale
pub mod mood {
    pub const MIN_VALUE: u8 = 1;
    pub const MAX_VALUE: u8 = 10;
    pub const DEFAULT_VALUE: u8 = 5;
}

/// Board export constants
pub mod export {
    /// File name of the exported board
    pub const FILE_NAME: &str = "moodboard.png";

    /// Board background (RGBA)
    pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];

    /// Text panel fill: white at 80% opacity
    pub const TEXT_PANEL: [u8; 4] = [255, 255, 255, 204];

    /// Text glyph color (ARGB)
    pub const TEXT_COLOR: u32 = 0xFF_1F_29_37;

    /// Glyph size used for text items
    pub const TEXT_SIZE: f32 = 16.0;

    /// Inner padding of text panels
    pub const TEXT_PADDING: f32 = 8.0;

    /// Default font family looked up through fontconfig
    pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";
}
