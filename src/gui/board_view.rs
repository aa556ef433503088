//! Board surface: paints items and turns pointer input into engine calls

use std::collections::HashMap;

use anyhow::{Context, Result};
use eframe::egui::{self, Pos2, Rect, Sense, Vec2};
use egui::emath::Rot2;
use egui::epaint::{Mesh, TextShape};
use tracing::{debug, warn};

use super::constants::*;
use crate::board::import::decode_data_uri;
use crate::board::{BoardEngine, BoardItem, ItemKind, ResizeHandle};
use crate::color::HexColor;
use crate::types::Position;

/// Largest texture side uploaded for an image item
const MAX_TEXTURE_SIDE: u32 = 2048;

/// Interaction collected while painting, applied once the frame's
/// borrows of the engine are released
enum BoardEvent {
    Select(String),
    BeginDrag(String, Position),
    BeginResize(String, ResizeHandle, Position),
    BeginTextEdit(String),
    Delete(String),
    ClearSelection,
}

enum TextEditOutcome {
    Keep,
    Commit,
    Cancel,
}

#[derive(Default)]
pub struct BoardView {
    /// Decoded image items by item id; `None` marks content that failed to decode
    textures: HashMap<String, Option<egui::TextureHandle>>,
    focus_text_edit: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cached textures (another board was opened)
    pub fn reset(&mut self) {
        self.textures.clear();
        self.focus_text_edit = false;
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, engine: &mut BoardEngine, size: Vec2) {
        let (board_response, painter) = ui.allocate_painter(size, Sense::click());
        let board_rect = board_response.rect;
        let origin = board_rect.min;
        let painter = painter.with_clip_rect(board_rect);

        painter.rect_filled(board_rect, 0.0, BOARD_BACKGROUND);
        painter.rect_stroke(
            board_rect,
            0.0,
            egui::Stroke::new(1.0, BOARD_BORDER),
            egui::StrokeKind::Inside,
        );

        self.textures.retain(|id, _| engine.item(id).is_some());

        let editable = engine.is_editable();
        let editing = engine.text_edit().map(|e| e.target_id.clone());
        let mut hits = Vec::new();

        for item in engine.paint_order() {
            let rect = item_rect(origin, item);
            let rot = Rot2::from_angle(item.rotation.to_radians());
            let is_editing = editing.as_deref() == Some(item.id.as_str());
            self.paint_item(ui.ctx(), &painter, item, rect, rot, is_editing);

            let highlighted = engine.active_target() == Some(item.id.as_str())
                || engine.selected() == Some(item.id.as_str());
            if editable && highlighted {
                painter.add(egui::Shape::closed_line(
                    rotated_corners(rect, rot),
                    egui::Stroke::new(ACTIVE_STROKE_WIDTH, SELECTION_STROKE),
                ));
            }
            hits.push((item.id.clone(), item.kind, rect));
        }

        let mut events = Vec::new();

        if editable {
            for (id, kind, rect) in &hits {
                let response = ui
                    .interact(*rect, ui.id().with(("board-item", id)), Sense::click_and_drag())
                    .on_hover_cursor(egui::CursorIcon::Grab);

                if response.double_clicked() && *kind == ItemKind::Text {
                    events.push(BoardEvent::BeginTextEdit(id.clone()));
                } else if response.drag_started() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        events.push(BoardEvent::BeginDrag(id.clone(), to_board(origin, pointer)));
                    }
                } else if response.clicked() {
                    events.push(BoardEvent::Select(id.clone()));
                }
            }

            if let Some(item) = engine.selected().and_then(|id| engine.item(id))
                && editing.as_deref() != Some(item.id.as_str())
            {
                let rect = item_rect(origin, item);
                let handles = [
                    (ResizeHandle::Corner, rect.right_bottom(), egui::CursorIcon::ResizeNwSe),
                    (ResizeHandle::Edge, rect.right_center(), egui::CursorIcon::ResizeHorizontal),
                ];
                for (handle, center, cursor) in handles {
                    let handle_rect = Rect::from_center_size(center, Vec2::splat(HANDLE_SIZE));
                    painter.rect_filled(handle_rect, 2.0, SELECTION_STROKE);
                    let response = ui
                        .interact(handle_rect, ui.id().with(("resize-handle", handle)), Sense::drag())
                        .on_hover_cursor(cursor);
                    if response.drag_started()
                        && let Some(pointer) = response.interact_pointer_pos()
                    {
                        events.push(BoardEvent::BeginResize(
                            item.id.clone(),
                            handle,
                            to_board(origin, pointer),
                        ));
                    }
                }

                let delete_rect =
                    Rect::from_center_size(rect.right_top(), Vec2::splat(DELETE_BUTTON_SIZE));
                if ui
                    .put(delete_rect, egui::Button::new("✕").small())
                    .on_hover_text("Delete item")
                    .clicked()
                {
                    events.push(BoardEvent::Delete(item.id.clone()));
                }
            }

            if board_response.clicked() {
                events.push(BoardEvent::ClearSelection);
            }
        }

        self.text_edit_ui(ui, engine, origin);
        self.apply(engine, events);
        track_gesture(ui, engine, origin);
    }

    fn apply(&mut self, engine: &mut BoardEngine, events: Vec<BoardEvent>) {
        for event in events {
            let result = match event {
                BoardEvent::Select(id) => engine.begin_drag(&id).map(|()| engine.end_drag()),
                BoardEvent::BeginDrag(id, pointer) => engine.begin_drag_gesture(&id, pointer),
                BoardEvent::BeginResize(id, handle, pointer) => {
                    engine.begin_resize_gesture(&id, handle, pointer)
                }
                BoardEvent::BeginTextEdit(id) => {
                    let result = engine.begin_text_edit(&id);
                    self.focus_text_edit = result.is_ok();
                    result
                }
                BoardEvent::Delete(id) => engine.delete(&id),
                BoardEvent::ClearSelection => {
                    engine.clear_selection();
                    Ok(())
                }
            };
            if let Err(e) = result {
                warn!(error = %e, "Board interaction rejected");
            }
        }
    }

    /// Inline editor over the text item being edited.
    /// Enter or focus loss commits, Escape cancels, Shift+Enter adds a line.
    fn text_edit_ui(&mut self, ui: &mut egui::Ui, engine: &mut BoardEngine, origin: Pos2) {
        let Some(rect) = engine
            .text_edit()
            .and_then(|edit| engine.item(&edit.target_id))
            .map(|item| item_rect(origin, item))
        else {
            return;
        };
        let Some(buffer) = engine.text_edit_buffer_mut() else {
            return;
        };

        // Plain Enter commits; take it before the editor turns it into a newline
        let edit_id = ui.id().with("board-text-edit");
        let enter = ui.memory(|m| m.has_focus(edit_id))
            && ui.input_mut(|i| {
                !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
            });

        let response = ui.put(
            rect,
            egui::TextEdit::multiline(buffer)
                .id(edit_id)
                .font(egui::FontId::proportional(TEXT_SIZE))
                .horizontal_align(egui::Align::Center),
        );
        if std::mem::take(&mut self.focus_text_edit) {
            response.request_focus();
        }

        let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
        let outcome = if escape {
            TextEditOutcome::Cancel
        } else if enter || response.lost_focus() {
            TextEditOutcome::Commit
        } else {
            TextEditOutcome::Keep
        };

        match outcome {
            TextEditOutcome::Keep => {}
            TextEditOutcome::Cancel => engine.cancel_text_edit(),
            TextEditOutcome::Commit => {
                if let Err(e) = engine.commit_text_edit() {
                    warn!(error = %e, "Failed to commit text edit");
                }
            }
        }
    }

    fn paint_item(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        item: &BoardItem,
        rect: Rect,
        rot: Rot2,
        is_editing: bool,
    ) {
        let corners = rotated_corners(rect, rot);
        match item.kind {
            ItemKind::Color => {
                let fill = HexColor::parse(&item.content)
                    .map(|c| c.to_egui())
                    .unwrap_or(BROKEN_IMAGE);
                painter.add(egui::Shape::convex_polygon(corners, fill, egui::Stroke::NONE));
            }
            ItemKind::Text => {
                painter.add(egui::Shape::convex_polygon(corners, TEXT_PANEL, egui::Stroke::NONE));
                if is_editing {
                    return;
                }
                let wrap_width = (rect.width() - PADDING * 2.0).max(1.0);
                let galley = painter.layout(
                    item.content.clone(),
                    egui::FontId::proportional(TEXT_SIZE),
                    TEXT_COLOR,
                    wrap_width,
                );
                // TextShape rotates about its top-left corner
                let pos = rect.center() - rot * (galley.size() / 2.0);
                painter.add(TextShape::new(pos, galley, TEXT_COLOR).with_angle(rot.angle()));
            }
            ItemKind::Image => match self.texture(ctx, item) {
                Some(texture) => {
                    let mut mesh = Mesh::with_texture(texture.id());
                    mesh.add_rect_with_uv(
                        rect,
                        cover_uv(texture.size_vec2(), rect.size()),
                        egui::Color32::WHITE,
                    );
                    mesh.rotate(rot, rect.center());
                    painter.add(egui::Shape::mesh(mesh));
                }
                None => {
                    painter.add(egui::Shape::convex_polygon(corners, BROKEN_IMAGE, egui::Stroke::NONE));
                }
            },
        }
    }

    fn texture(&mut self, ctx: &egui::Context, item: &BoardItem) -> Option<&egui::TextureHandle> {
        self.textures
            .entry(item.id.clone())
            .or_insert_with(|| match load_color_image(&item.content) {
                Ok(image) => {
                    debug!(id = %item.id, size = ?image.size, "Uploaded board image texture");
                    Some(ctx.load_texture(
                        format!("board-item-{}", item.id),
                        image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!(id = %item.id, error = ?e, "Failed to decode board image");
                    None
                }
            })
            .as_ref()
    }
}

/// Feed the pointer to the running gesture; release ends it, losing the
/// pointer or window focus cancels it
fn track_gesture(ui: &egui::Ui, engine: &mut BoardEngine, origin: Pos2) {
    if engine.gesture().is_none() {
        return;
    }
    let (pointer, released, focused) = ui.input(|i| {
        (
            i.pointer.latest_pos(),
            i.pointer.any_released() || !i.pointer.primary_down(),
            i.focused,
        )
    });

    let Some(pointer) = pointer.filter(|_| focused) else {
        engine.cancel_gesture();
        return;
    };
    if let Err(e) = engine.pointer_move(to_board(origin, pointer)) {
        warn!(error = %e, "Pointer move rejected");
        engine.cancel_gesture();
        return;
    }
    if released {
        engine.end_gesture();
    }
}

fn load_color_image(data_uri: &str) -> Result<egui::ColorImage> {
    let bytes = decode_data_uri(data_uri)?;
    let mut image = image::load_from_memory(&bytes).context("Failed to decode image data")?;
    if image.width() > MAX_TEXTURE_SIDE || image.height() > MAX_TEXTURE_SIDE {
        image = image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE);
    }
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

fn item_rect(origin: Pos2, item: &BoardItem) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(item.position.x, item.position.y),
        Vec2::new(item.size.width, item.size.height),
    )
}

fn to_board(origin: Pos2, pointer: Pos2) -> Position {
    Position::new(pointer.x - origin.x, pointer.y - origin.y)
}

fn rotated_corners(rect: Rect, rot: Rot2) -> Vec<Pos2> {
    let center = rect.center();
    [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
        .into_iter()
        .map(|corner| center + rot * (corner - center))
        .collect()
}

/// UV rectangle that scales the texture to cover `target`, cropping the overflow evenly
fn cover_uv(texture: Vec2, target: Vec2) -> Rect {
    if texture.x <= 0.0 || texture.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    }
    let scale = (target.x / texture.x).max(target.y / texture.y);
    let visible = Vec2::new(
        (target.x / scale / texture.x).min(1.0),
        (target.y / scale / texture.y).min(1.0),
    );
    let min = Pos2::new((1.0 - visible.x) / 2.0, (1.0 - visible.y) / 2.0);
    Rect::from_min_size(min, visible)
}
