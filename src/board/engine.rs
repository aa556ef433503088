//! Board interaction engine
//!
//! Owns the live item collection of the board being edited and applies
//! pointer and toolbar events to it. Every mutating operation is only
//! accepted in [`DisplayMode::Edit`].

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::gesture::{CaptureRegistry, Gesture, GestureKind, ResizeHandle};
use super::item::BoardItem;
use crate::constants::board::{ACTIVE_Z_INDEX, MIN_ITEM_SIZE};
use crate::ids::IdGenerator;
use crate::types::{Position, Size};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board item '{0}' not found")]
    ItemNotFound(String),
    #[error("board item '{0}' is not a text item")]
    NotTextItem(String),
    #[error("board is read-only in preview mode")]
    ReadOnly,
    #[error("board item '{0}' is not the active drag target")]
    NotDragTarget(String),
    #[error("no text edit in progress")]
    NoTextEdit,
}

/// Edit shows interactive affordances, preview renders the same items read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Edit,
    Preview,
}

/// Inline edit of a text item's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub target_id: String,
    pub buffer: String,
}

#[derive(Debug, Default)]
pub struct BoardEngine {
    items: Vec<BoardItem>,
    mode: DisplayMode,
    /// Single active drag target
    active: Option<String>,
    /// Item showing delete/resize affordances
    selected: Option<String>,
    gesture: Option<Gesture>,
    text_edit: Option<TextEdit>,
    captures: CaptureRegistry,
    ids: IdGenerator,
}

impl BoardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[BoardItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&BoardItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_editable(&self) -> bool {
        self.mode == DisplayMode::Edit
    }

    /// Switch display mode. Leaving edit mode detaches every affordance:
    /// the running gesture is released and a pending text edit is discarded.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode == mode {
            return;
        }
        debug!(from = ?self.mode, to = ?mode, "Board display mode changed");
        self.mode = mode;
        if mode == DisplayMode::Preview {
            self.gesture = None;
            self.active = None;
            self.text_edit = None;
        }
    }

    pub fn active_target(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Number of pointer captures currently held by gestures
    pub fn active_captures(&self) -> usize {
        self.captures.active()
    }

    fn ensure_editable(&self) -> Result<(), BoardError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(BoardError::ReadOnly)
        }
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut BoardItem, BoardError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))
    }

    fn push(&mut self, item: BoardItem) -> String {
        info!(id = %item.id, kind = ?item.kind, z_index = item.z_index, "Added board item");
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    // === Creation ===

    /// Append an image item whose content is an already decoded data URI
    pub fn create_image(&mut self, data_uri: String) -> Result<String, BoardError> {
        self.ensure_editable()?;
        let item = BoardItem::image(self.ids.next_id(), data_uri, self.items.len());
        Ok(self.push(item))
    }

    pub fn create_text(&mut self) -> Result<String, BoardError> {
        self.ensure_editable()?;
        let item = BoardItem::text(self.ids.next_id(), self.items.len());
        Ok(self.push(item))
    }

    /// Append a color block using the thread-local RNG (unseeded per process)
    pub fn create_color(&mut self) -> Result<String, BoardError> {
        self.create_color_with(&mut rand::rng())
    }

    pub fn create_color_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, BoardError> {
        self.ensure_editable()?;
        let item = BoardItem::color(self.ids.next_id(), rng);
        Ok(self.push(item))
    }

    // === Drag ===

    /// Make `id` the single active drag target, replacing any previous one
    pub fn begin_drag(&mut self, id: &str) -> Result<(), BoardError> {
        self.ensure_editable()?;
        if self.item(id).is_none() {
            return Err(BoardError::ItemNotFound(id.to_string()));
        }
        if let Some(previous) = self.active.as_deref().filter(|prev| *prev != id) {
            debug!(previous, id, "Replacing active drag target");
        }
        self.active = Some(id.to_string());
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Move the active drag target by a delta. Deltas addressed to any other
    /// item are rejected. Positions are not clamped to the surface.
    pub fn drag(&mut self, id: &str, delta_x: f32, delta_y: f32) -> Result<(), BoardError> {
        self.ensure_editable()?;
        if self.active.as_deref() != Some(id) {
            return Err(BoardError::NotDragTarget(id.to_string()));
        }
        let item = self.item_mut(id)?;
        item.position.x += delta_x;
        item.position.y += delta_y;
        Ok(())
    }

    /// Clear the active drag target. Idempotent.
    pub fn end_drag(&mut self) {
        if let Some(id) = self.active.take() {
            debug!(id, "Drag ended");
        }
        if matches!(self.gesture.as_ref().map(|g| g.kind), Some(GestureKind::Drag)) {
            self.gesture = None;
        }
    }

    // === Geometry ===

    /// Set an item's size, clamping each axis to at least 50px
    pub fn resize(&mut self, id: &str, width: f32, height: f32) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let item = self.item_mut(id)?;
        item.size = Size::new(width, height).at_least(MIN_ITEM_SIZE);
        Ok(())
    }

    /// Add `delta_degrees` to the item's rotation, no wrapping
    pub fn rotate(&mut self, id: &str, delta_degrees: f32) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let item = self.item_mut(id)?;
        item.rotation += delta_degrees;
        Ok(())
    }

    // === Content ===

    pub fn edit_text(&mut self, id: &str, content: String) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let item = self.item_mut(id)?;
        if !item.is_text() {
            return Err(BoardError::NotTextItem(id.to_string()));
        }
        item.content = content;
        Ok(())
    }

    /// Start an inline edit of a text item (double-activation)
    pub fn begin_text_edit(&mut self, id: &str) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let item = self
            .item(id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))?;
        if !item.is_text() {
            return Err(BoardError::NotTextItem(id.to_string()));
        }
        self.text_edit = Some(TextEdit {
            target_id: id.to_string(),
            buffer: item.content.clone(),
        });
        Ok(())
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn text_edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.text_edit.as_mut().map(|edit| &mut edit.buffer)
    }

    /// Apply the edit buffer to its item (Enter or focus loss)
    pub fn commit_text_edit(&mut self) -> Result<(), BoardError> {
        let edit = self.text_edit.take().ok_or(BoardError::NoTextEdit)?;
        self.edit_text(&edit.target_id, edit.buffer)
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit = None;
    }

    pub fn delete(&mut self, id: &str) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))?;
        self.items.remove(index);

        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.gesture.as_ref().is_some_and(|g| g.target_id == id) {
            self.gesture = None;
        }
        if self.text_edit.as_ref().is_some_and(|e| e.target_id == id) {
            self.text_edit = None;
        }
        info!(id, remaining = self.items.len(), "Deleted board item");
        Ok(())
    }

    // === Pointer gestures ===

    pub fn begin_drag_gesture(&mut self, id: &str, pointer: Position) -> Result<(), BoardError> {
        self.begin_drag(id)?;
        let item = self
            .item(id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))?;
        let gesture = Gesture::new(
            id.to_string(),
            GestureKind::Drag,
            item.position,
            item.size,
            pointer,
            self.captures.acquire(),
        );
        self.gesture = Some(gesture);
        Ok(())
    }

    pub fn begin_resize_gesture(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        pointer: Position,
    ) -> Result<(), BoardError> {
        self.ensure_editable()?;
        let item = self
            .item(id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))?;
        let gesture = Gesture::new(
            id.to_string(),
            GestureKind::Resize(handle),
            item.position,
            item.size,
            pointer,
            self.captures.acquire(),
        );
        self.gesture = Some(gesture);
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Feed a pointer position to the running gesture, if any
    pub fn pointer_move(&mut self, pointer: Position) -> Result<(), BoardError> {
        let Some(gesture) = self.gesture.as_ref() else {
            return Ok(());
        };
        let id = gesture.target_id.clone();

        match gesture.kind {
            GestureKind::Drag => {
                let target = gesture.dragged_position(pointer);
                let current = self
                    .item(&id)
                    .ok_or_else(|| BoardError::ItemNotFound(id.clone()))?
                    .position;
                let delta = target - current;
                self.drag(&id, delta.x, delta.y)
            }
            GestureKind::Resize(handle) => {
                let current_height = self
                    .item(&id)
                    .ok_or_else(|| BoardError::ItemNotFound(id.clone()))?
                    .size
                    .height;
                let size = gesture.resized_size(handle, pointer, current_height);
                self.resize(&id, size.width, size.height)
            }
        }
    }

    /// Finish the running gesture on pointer release
    pub fn end_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            debug!(id = %gesture.target_id, kind = ?gesture.kind, "Gesture ended");
            if gesture.kind == GestureKind::Drag {
                self.end_drag();
            }
        }
    }

    /// Abandon the running gesture (pointer left the surface, window lost focus).
    /// Geometry already applied is kept.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            warn!(id = %gesture.target_id, kind = ?gesture.kind, "Gesture cancelled");
            if gesture.kind == GestureKind::Drag {
                self.end_drag();
            }
        }
    }

    // === Rendering and persistence helpers ===

    /// Items in paint order: ascending z-index, insertion order on ties,
    /// the active drag target on top while editing
    pub fn paint_order(&self) -> Vec<&BoardItem> {
        let mut ordered: Vec<&BoardItem> = self.items.iter().collect();
        ordered.sort_by_key(|item| self.effective_z_index(item));
        ordered
    }

    pub fn effective_z_index(&self, item: &BoardItem) -> i32 {
        if self.is_editable() && self.active.as_deref() == Some(item.id.as_str()) {
            ACTIVE_Z_INDEX.max(item.z_index)
        } else {
            item.z_index
        }
    }

    /// Copy of the current items, for saving into a mood board
    pub fn snapshot(&self) -> Vec<BoardItem> {
        self.items.clone()
    }

    /// Replace the working items (opening a saved board); transient state is reset
    pub fn load_items(&mut self, items: Vec<BoardItem>) {
        info!(count = items.len(), "Loaded board items into editor");
        self.items = items;
        self.active = None;
        self.selected = None;
        self.gesture = None;
        self.text_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::item::ItemKind;
    use crate::constants::board::COLOR_PALETTE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine_with_text() -> (BoardEngine, String) {
        let mut engine = BoardEngine::new();
        let id = engine.create_text().unwrap();
        (engine, id)
    }

    #[test]
    fn test_create_assigns_stacking_order() {
        let mut engine = BoardEngine::new();
        let text = engine.create_text().unwrap();
        let image = engine.create_image("data:image/png;base64,AA==".to_string()).unwrap();
        let color = engine.create_color().unwrap();

        assert_eq!(engine.item(&text).unwrap().z_index, 1);
        assert_eq!(engine.item(&image).unwrap().z_index, 2);
        assert_eq!(engine.item(&color).unwrap().z_index, 0);
        assert_eq!(engine.items().len(), 3);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let mut engine = BoardEngine::new();
        let ids: Vec<String> = (0..50).map(|_| engine.create_text().unwrap()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_color_blocks_use_palette() {
        let mut engine = BoardEngine::new();
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..100 {
            let id = engine.create_color_with(&mut rng).unwrap();
            let item = engine.item(&id).unwrap();
            assert!(COLOR_PALETTE.contains(&item.content.as_str()));
        }
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let (mut engine, id) = engine_with_text();
        for (w, h) in [(-100.0, -1.0), (0.0, 0.0), (49.0, 300.0), (10.0, 49.99), (f32::MIN, f32::NAN)] {
            engine.resize(&id, w, h).unwrap();
            let size = engine.item(&id).unwrap().size;
            assert!(size.width >= 50.0 && size.height >= 50.0, "{w}x{h} -> {size:?}");
        }
        engine.resize(&id, 320.0, 75.0).unwrap();
        assert_eq!(engine.item(&id).unwrap().size, Size::new(320.0, 75.0));
    }

    #[test]
    fn test_rotation_accumulates_without_wrapping() {
        let (mut engine, id) = engine_with_text();
        engine.rotate(&id, 270.0).unwrap();
        engine.rotate(&id, 180.0).unwrap();
        assert_eq!(engine.item(&id).unwrap().rotation, 450.0);
        engine.rotate(&id, -900.0).unwrap();
        assert_eq!(engine.item(&id).unwrap().rotation, -450.0);
    }

    #[test]
    fn test_drag_applies_to_active_target_only() {
        let mut engine = BoardEngine::new();
        let a = engine.create_text().unwrap();
        let b = engine.create_text().unwrap();

        engine.begin_drag(&a).unwrap();
        engine.drag(&a, 25.0, -10.0).unwrap();
        assert_eq!(engine.item(&a).unwrap().position, Position::new(175.0, 140.0));

        assert_eq!(engine.drag(&b, 5.0, 5.0), Err(BoardError::NotDragTarget(b.clone())));
        assert_eq!(engine.item(&b).unwrap().position, Position::new(150.0, 150.0));
    }

    #[test]
    fn test_drag_is_not_clamped() {
        let (mut engine, id) = engine_with_text();
        engine.begin_drag(&id).unwrap();
        engine.drag(&id, -5000.0, 9000.0).unwrap();
        assert_eq!(engine.item(&id).unwrap().position, Position::new(-4850.0, 9150.0));
    }

    #[test]
    fn test_new_drag_replaces_previous_target() {
        let mut engine = BoardEngine::new();
        let a = engine.create_text().unwrap();
        let b = engine.create_text().unwrap();
        engine.begin_drag(&a).unwrap();
        engine.begin_drag(&b).unwrap();
        assert_eq!(engine.active_target(), Some(b.as_str()));
        assert!(engine.drag(&a, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let (mut engine, id) = engine_with_text();
        engine.begin_drag(&id).unwrap();
        engine.end_drag();
        engine.end_drag();
        assert_eq!(engine.active_target(), None);
        // Selection survives so the handles stay available
        assert_eq!(engine.selected(), Some(id.as_str()));
    }

    #[test]
    fn test_delete_leaves_other_items_untouched() {
        let mut engine = BoardEngine::new();
        let a = engine.create_text().unwrap();
        let b = engine.create_color().unwrap();
        let c = engine.create_text().unwrap();
        let before_a = engine.item(&a).unwrap().clone();
        let before_c = engine.item(&c).unwrap().clone();

        engine.delete(&b).unwrap();

        assert_eq!(engine.items().len(), 2);
        assert!(engine.item(&b).is_none());
        assert_eq!(engine.item(&a).unwrap(), &before_a);
        assert_eq!(engine.item(&c).unwrap(), &before_c);
        assert_eq!(engine.item(&c).unwrap().z_index, 3);
    }

    #[test]
    fn test_delete_unknown_item() {
        let mut engine = BoardEngine::new();
        assert_eq!(engine.delete("nope"), Err(BoardError::ItemNotFound("nope".to_string())));
    }

    #[test]
    fn test_delete_clears_references() {
        let (mut engine, id) = engine_with_text();
        engine.begin_drag_gesture(&id, Position::new(0.0, 0.0)).unwrap();
        engine.delete(&id).unwrap();
        assert_eq!(engine.active_target(), None);
        assert_eq!(engine.selected(), None);
        assert_eq!(engine.active_captures(), 0);
    }

    #[test]
    fn test_text_edit_scenario() {
        let (mut engine, id) = engine_with_text();
        engine.begin_text_edit(&id).unwrap();
        let buffer = engine.text_edit_buffer_mut().unwrap();
        buffer.clear();
        buffer.push_str("Hello");
        engine.commit_text_edit().unwrap();

        let item = engine.item(&id).unwrap();
        assert_eq!(item.content, "Hello");
        assert_eq!(item.kind, ItemKind::Text);
        assert!(engine.text_edit().is_none());
    }

    #[test]
    fn test_cancelled_text_edit_keeps_content() {
        let (mut engine, id) = engine_with_text();
        engine.begin_text_edit(&id).unwrap();
        engine.text_edit_buffer_mut().unwrap().push_str(" more");
        engine.cancel_text_edit();
        assert_eq!(engine.item(&id).unwrap().content, "Double click to edit");
        assert_eq!(engine.commit_text_edit(), Err(BoardError::NoTextEdit));
    }

    #[test]
    fn test_edit_text_rejects_non_text() {
        let mut engine = BoardEngine::new();
        let color = engine.create_color().unwrap();
        let before = engine.item(&color).unwrap().content.clone();
        assert_eq!(
            engine.edit_text(&color, "oops".to_string()),
            Err(BoardError::NotTextItem(color.clone()))
        );
        assert_eq!(engine.begin_text_edit(&color), Err(BoardError::NotTextItem(color.clone())));
        assert_eq!(engine.item(&color).unwrap().content, before);
    }

    #[test]
    fn test_preview_mode_is_read_only() {
        let (mut engine, id) = engine_with_text();
        engine.set_mode(DisplayMode::Preview);

        assert_eq!(engine.create_text(), Err(BoardError::ReadOnly));
        assert_eq!(engine.begin_drag(&id), Err(BoardError::ReadOnly));
        assert_eq!(engine.resize(&id, 10.0, 10.0), Err(BoardError::ReadOnly));
        assert_eq!(engine.rotate(&id, 10.0), Err(BoardError::ReadOnly));
        assert_eq!(engine.delete(&id), Err(BoardError::ReadOnly));
        assert_eq!(engine.begin_text_edit(&id), Err(BoardError::ReadOnly));
        assert_eq!(engine.items().len(), 1);

        engine.set_mode(DisplayMode::Edit);
        assert!(engine.delete(&id).is_ok());
    }

    #[test]
    fn test_drag_gesture_tracks_cumulative_pointer() {
        let (mut engine, id) = engine_with_text();
        engine.begin_drag_gesture(&id, Position::new(10.0, 10.0)).unwrap();
        assert_eq!(engine.active_captures(), 1);

        engine.pointer_move(Position::new(20.0, 15.0)).unwrap();
        engine.pointer_move(Position::new(60.0, 40.0)).unwrap();
        assert_eq!(engine.item(&id).unwrap().position, Position::new(200.0, 180.0));

        engine.end_gesture();
        assert_eq!(engine.active_captures(), 0);
        assert_eq!(engine.active_target(), None);

        // Moves after release do nothing
        engine.pointer_move(Position::new(500.0, 500.0)).unwrap();
        assert_eq!(engine.item(&id).unwrap().position, Position::new(200.0, 180.0));
    }

    #[test]
    fn test_corner_resize_gesture_clamps() {
        let (mut engine, id) = engine_with_text();
        engine
            .begin_resize_gesture(&id, ResizeHandle::Corner, Position::new(0.0, 0.0))
            .unwrap();
        engine.pointer_move(Position::new(40.0, 30.0)).unwrap();
        assert_eq!(engine.item(&id).unwrap().size, Size::new(240.0, 80.0));
        engine.pointer_move(Position::new(-400.0, -400.0)).unwrap();
        assert_eq!(engine.item(&id).unwrap().size, Size::new(50.0, 50.0));
        engine.end_gesture();
        assert_eq!(engine.active_captures(), 0);
    }

    #[test]
    fn test_edge_resize_gesture_changes_width_only() {
        let (mut engine, id) = engine_with_text();
        engine.resize(&id, 200.0, 90.0).unwrap();
        engine
            .begin_resize_gesture(&id, ResizeHandle::Edge, Position::new(0.0, 0.0))
            .unwrap();
        engine.pointer_move(Position::new(30.0, 200.0)).unwrap();
        assert_eq!(engine.item(&id).unwrap().size, Size::new(230.0, 90.0));
        engine.end_gesture();
    }

    #[test]
    fn test_captures_released_on_every_exit_path() {
        let (mut engine, id) = engine_with_text();

        engine.begin_drag_gesture(&id, Position::default()).unwrap();
        engine.cancel_gesture();
        assert_eq!(engine.active_captures(), 0);

        engine.begin_drag_gesture(&id, Position::default()).unwrap();
        engine
            .begin_resize_gesture(&id, ResizeHandle::Corner, Position::default())
            .unwrap();
        assert_eq!(engine.active_captures(), 1);

        engine.set_mode(DisplayMode::Preview);
        assert_eq!(engine.active_captures(), 0);
        engine.set_mode(DisplayMode::Edit);

        engine.begin_drag_gesture(&id, Position::default()).unwrap();
        engine.load_items(Vec::new());
        assert_eq!(engine.active_captures(), 0);
    }

    #[test]
    fn test_paint_order_puts_active_on_top() {
        let mut engine = BoardEngine::new();
        let a = engine.create_text().unwrap();
        let b = engine.create_text().unwrap();
        let color = engine.create_color().unwrap();

        let order: Vec<&str> = engine.paint_order().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec![color.as_str(), a.as_str(), b.as_str()]);

        engine.begin_drag(&a).unwrap();
        let order: Vec<&str> = engine.paint_order().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order.last(), Some(&a.as_str()));
    }

    #[test]
    fn test_snapshot_and_load_items() {
        let (mut engine, id) = engine_with_text();
        let snapshot = engine.snapshot();
        engine.delete(&id).unwrap();
        assert!(engine.items().is_empty());

        engine.load_items(snapshot);
        assert_eq!(engine.items().len(), 1);
        assert_eq!(engine.items()[0].id, id);
    }
}
