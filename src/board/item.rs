//! Placeable mood board items

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::constants::board;
use crate::types::{Position, Size};

/// What an item renders as, and how its `content` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// `content` is a data URI
    Image,
    /// `content` is the displayed text
    Text,
    /// `content` is a `#rrggbb` color
    Color,
}

/// A single item on the board surface
///
/// Geometry is in pixels relative to the board's top-left corner.
/// `rotation` is in degrees and accumulates without wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub content: String,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub z_index: i32,
}

impl BoardItem {
    /// Imported image stacked above the `item_count` existing items
    pub fn image(id: String, data_uri: String, item_count: usize) -> Self {
        Self {
            id,
            kind: ItemKind::Image,
            content: data_uri,
            position: Position::from_tuple(board::IMAGE_POSITION),
            size: Size::from_tuple(board::IMAGE_SIZE),
            rotation: 0.0,
            z_index: stacked_z_index(item_count),
        }
    }

    pub fn text(id: String, item_count: usize) -> Self {
        Self {
            id,
            kind: ItemKind::Text,
            content: board::TEXT_PLACEHOLDER.to_string(),
            position: Position::from_tuple(board::TEXT_POSITION),
            size: Size::from_tuple(board::TEXT_SIZE),
            rotation: 0.0,
            z_index: stacked_z_index(item_count),
        }
    }

    /// Background color block with a palette color picked by `rng`
    pub fn color<R: Rng + ?Sized>(id: String, rng: &mut R) -> Self {
        // The palette is a non-empty constant, the fallback is unreachable
        let content = board::COLOR_PALETTE
            .choose(rng)
            .copied()
            .unwrap_or(board::COLOR_PALETTE[0]);

        Self {
            id,
            kind: ItemKind::Color,
            content: content.to_string(),
            position: Position::from_tuple(board::COLOR_POSITION),
            size: Size::from_tuple(board::COLOR_SIZE),
            rotation: 0.0,
            z_index: board::COLOR_Z_INDEX,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == ItemKind::Text
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }
}

fn stacked_z_index(item_count: usize) -> i32 {
    i32::try_from(item_count).map_or(i32::MAX, |n| n.saturating_add(1))
}
