//! Mood board editing: item model, interaction engine, gestures and image import

pub mod engine;
pub mod gesture;
pub mod import;
pub mod item;

pub use engine::{BoardEngine, BoardError, DisplayMode};
pub use gesture::ResizeHandle;
pub use import::ImageImporter;
pub use item::{BoardItem, ItemKind};
