//! The editor controller: owns the document history, selection, viewport and
//! tool state, and turns renderer gestures into committed store changes.
//!
//! Every store change goes through [`Editor::commit`], which pushes one
//! history step and prunes the selection. Selection and viewport changes are
//! never recorded in history.

use crate::align::{self, AlignOp, DistributeAxis, MIN_ALIGN_SELECTION, MIN_DISTRIBUTE_SELECTION};
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, Fill, Image, Line, PathElement, ResolvedGradient};
use crate::history::History;
use crate::patch::{ElementPatch, NumericField};
use crate::pen::{ControlHandle, PenEvent, PenTool};
use crate::selection::Selection;
use crate::shortcuts::{EditorCommand, KeyModifiers, ShortcutRegistry};
use crate::snap::{self, SNAP_THRESHOLD, SnapLines};
use crate::store::ElementStore;
use crate::template::Template;
use crate::tools::{self, ToolKind};
use crate::transform::{self, NodeTransform};
use crate::viewport::Viewport;
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;

/// Pointer interaction in progress. Line drawing and panning exclude each
/// other.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// A line being dragged out. It joins the store on pointer-up.
    DrawingLine(Line),
    /// Panning the canvas; `last` is the previous pointer sample in screen
    /// coordinates.
    Panning { last: Point },
}

/// Request to open an in-place text editor over a text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditRequest {
    pub id: ElementId,
    pub text: String,
    /// Top-left of the editor overlay in screen coordinates.
    pub screen_position: Point,
    /// Font size in screen pixels.
    pub font_size: f64,
    /// Box width in screen pixels.
    pub width: f64,
}

/// Fill ready for painting. Gradient geometry is relative to the top-left of
/// the item's `self_rect`.
#[derive(Debug, Clone)]
pub enum ResolvedFill {
    Solid(Color),
    Gradient(ResolvedGradient),
}

/// One element as the renderer should draw it.
#[derive(Debug, Clone)]
pub struct DrawItem<'a> {
    pub element: &'a Element,
    pub selected: bool,
    pub draggable: bool,
    pub self_rect: Rect,
    /// Element frame to scene.
    pub transform: Affine,
    pub fill: Option<ResolvedFill>,
    pub opacity: f64,
}

fn resolve_fill(element: &Element, frame: Rect) -> Option<ResolvedFill> {
    match element.style().fill.as_ref()? {
        Fill::Solid(color) => Some(ResolvedFill::Solid(Color::from(*color))),
        Fill::Gradient(spec) => Some(ResolvedFill::Gradient(
            spec.resolve(frame.width(), frame.height()),
        )),
    }
}

pub struct Editor {
    history: History<ElementStore>,
    selection: Selection,
    viewport: Viewport,
    tool: ToolKind,
    interaction: Interaction,
    pen: PenTool,
    clipboard: Option<Element>,
    config: EditorConfig,
    /// Set when the store changed since the last [`Editor::take_dirty`].
    dirty: bool,
    /// Swallows the click that follows the pointer-up ending a line.
    suppress_click: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, ElementStore::new())
    }

    /// Start from an existing document, e.g. one restored by auto-save.
    /// The initial store is not undoable.
    pub fn with_store(config: EditorConfig, store: ElementStore) -> Self {
        Self {
            history: History::new(store).with_limit(config.history_limit),
            selection: Selection::new(),
            viewport: config.viewport(),
            tool: ToolKind::Select,
            interaction: Interaction::Idle,
            pen: PenTool::new(),
            clipboard: None,
            config,
            dirty: false,
            suppress_click: false,
        }
    }

    pub fn store(&self) -> &ElementStore {
        self.history.current()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn pen(&self) -> &PenTool {
        &self.pen
    }

    pub fn clipboard(&self) -> Option<&Element> {
        self.clipboard.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the store changed since the last call. Drives auto-save.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Apply `edit` to a copy of the current store and record it as one
    /// history step. Nothing is recorded when `edit` reports no change.
    pub fn commit(&mut self, edit: impl FnOnce(&mut ElementStore) -> bool) -> bool {
        let mut next = self.history.current().clone();
        if !edit(&mut next) {
            return false;
        }
        self.history.push(next);
        self.store_changed();
        true
    }

    fn store_changed(&mut self) {
        if self.selection.retain_existing(self.history.current()) {
            log::debug!("Dropped stale ids from the selection");
        }
        self.dirty = true;
    }

    fn scene(&self, screen: Point) -> Point {
        self.viewport.screen_to_scene(screen)
    }

    /// Add an element on top and select it.
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        let id = element.id();
        if !self.commit(|store| store.add(element)) {
            return None;
        }
        self.selection.select_only(id);
        Some(id)
    }

    pub fn add_image(&mut self, image: Image) -> Option<ElementId> {
        self.add_element(Element::Image(image))
    }

    // Tools

    /// Switch tools. Leaving the pen discards its unfinished path and leaving
    /// the line tool drops an unfinished line.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        if self.tool == ToolKind::Pen {
            self.pen.cancel();
        }
        if matches!(self.interaction, Interaction::DrawingLine(_)) {
            self.interaction = Interaction::Idle;
        }
        log::debug!("Tool {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
    }

    // Pointer gestures

    /// Pointer pressed. `on_background` is true when nothing was hit.
    pub fn pointer_down(&mut self, screen: Point, on_background: bool) {
        if self.interaction != Interaction::Idle {
            return;
        }
        match self.tool {
            ToolKind::Line => {
                let start = self.scene(screen);
                self.interaction = Interaction::DrawingLine(tools::start_line(start));
            }
            ToolKind::Select if on_background => {
                self.interaction = Interaction::Panning { last: screen };
            }
            _ => {}
        }
    }

    /// Pointer moved. Returns whether the view needs a redraw.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        let scene = self.scene(screen);
        match &mut self.interaction {
            Interaction::DrawingLine(line) => {
                line.set_end(scene);
                true
            }
            Interaction::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan(delta);
                true
            }
            Interaction::Idle => false,
        }
    }

    /// Pointer released. A line being drawn is committed, selected, and the
    /// tool returns to select.
    pub fn pointer_up(&mut self, screen: Point) -> Option<ElementId> {
        match std::mem::take(&mut self.interaction) {
            Interaction::DrawingLine(mut line) => {
                line.set_end(self.scene(screen));
                let id = self.add_element(Element::Line(line));
                self.tool = ToolKind::Select;
                self.suppress_click = true;
                id
            }
            Interaction::Panning { .. } | Interaction::Idle => None,
        }
    }

    /// The line being drawn, for the overlay.
    pub fn line_preview(&self) -> Option<&Line> {
        match &self.interaction {
            Interaction::DrawingLine(line) => Some(line),
            _ => None,
        }
    }

    /// Click on empty canvas. Select clears the selection, click-to-place
    /// tools drop their default element, the pen adds or closes on a node.
    pub fn click_canvas(&mut self, screen: Point) -> Option<ElementId> {
        if std::mem::take(&mut self.suppress_click) {
            return None;
        }
        if self.interaction != Interaction::Idle {
            return None;
        }
        let scene = self.scene(screen);
        match self.tool {
            ToolKind::Select => {
                self.selection.clear();
                None
            }
            ToolKind::Pen => self.pen_click(scene),
            tool => {
                let element = tools::create_default(tool, scene)?;
                self.add_element(element)
            }
        }
    }

    /// Click on an element. With `multi` the element is toggled in the
    /// selection.
    pub fn click_element(&mut self, id: ElementId, multi: bool) -> bool {
        if !self.store().contains(id) {
            log::debug!("click on unknown element {id}");
            return false;
        }
        self.selection.click(id, multi);
        true
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.history.current());
    }

    /// Drag finished at `position` (the node's new anchor).
    pub fn drag_end(&mut self, id: ElementId, position: Point) -> bool {
        let Some(element) = self.editable(id) else {
            return false;
        };
        let moved = transform::finalize_drag(element, position);
        self.commit(|store| store.replace(moved))
    }

    /// Resize/rotate finished with the node's final transform.
    pub fn transform_end(&mut self, id: ElementId, node: &NodeTransform) -> bool {
        let Some(element) = self.editable(id) else {
            return false;
        };
        let transformed = transform::finalize_transform(element, node);
        self.commit(|store| store.replace(transformed))
    }

    fn editable(&self, id: ElementId) -> Option<&Element> {
        match self.store().get(id) {
            Some(e) if e.is_locked() => {
                log::debug!("Ignoring gesture on locked element {id}");
                None
            }
            Some(e) => Some(e),
            None => {
                log::debug!("Gesture on unknown element {id}");
                None
            }
        }
    }

    /// Grid-snapped position when snapping is enabled.
    pub fn snap_position(&self, point: Point) -> Point {
        snap::snap_point(point, &self.config.snap).point
    }

    /// Guides for element `id` if it were moved to `position`.
    pub fn drag_guides(&self, id: ElementId, position: Point) -> SnapLines {
        if !self.config.snap.snap_to_elements {
            return SnapLines::default();
        }
        let Some(element) = self.store().get(id) else {
            return SnapLines::default();
        };
        let current = element.bounds() + (position - element.position());
        let others = self
            .store()
            .iter()
            .filter(|e| e.id() != id)
            .map(Element::bounds);
        snap::snap_lines(current, others, SNAP_THRESHOLD)
    }

    /// Double-click on an element. Only text elements open an editor.
    pub fn double_click(&self, id: ElementId) -> Option<TextEditRequest> {
        let text = self.store().get(id)?.as_text()?;
        let scale = self.viewport.scale;
        Some(TextEditRequest {
            id,
            text: text.text.clone(),
            screen_position: self.viewport.scene_to_screen(text.position),
            font_size: text.font_size * scale,
            width: text.width * scale,
        })
    }

    /// Replace a text element's content.
    pub fn commit_text(&mut self, id: ElementId, text: String) -> bool {
        let patch = ElementPatch {
            text: Some(text),
            ..ElementPatch::default()
        };
        self.update_element(id, &patch)
    }

    /// Wheel over the canvas: zoom around the pointer.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.viewport.zoom_at(screen, delta_y);
    }

    // Pen

    fn pen_click(&mut self, scene: Point) -> Option<ElementId> {
        let tolerance = self.config.hit_tolerance / self.viewport.scale;
        if let Some(index) = self.pen.node_at(scene, tolerance) {
            if let Some(PenEvent::Closed(path)) = self.pen.click_node(index) {
                return self.commit_path(path);
            }
            return None;
        }
        self.pen.click(scene);
        None
    }

    /// Drag a handle of the pen's selected node.
    pub fn pen_drag_control(&mut self, handle: ControlHandle, screen: Point) -> bool {
        let scene = self.scene(screen);
        self.pen.drag_control(handle, scene)
    }

    /// Commit the pen path as an open path.
    pub fn finish_pen(&mut self) -> Option<ElementId> {
        let path = self.pen.finish()?;
        self.commit_path(path)
    }

    fn commit_path(&mut self, path: PathElement) -> Option<ElementId> {
        let id = self.add_element(Element::Path(path));
        self.tool = ToolKind::Select;
        id
    }

    /// The pen path as drawn so far.
    pub fn pen_preview(&self) -> Option<PathElement> {
        self.pen.preview()
    }

    // Commands

    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.store_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.store_changed();
        true
    }

    /// Delete every selected element as one step. Returns how many were
    /// removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.selected().to_vec();
        let mut removed = 0;
        self.commit(|store| {
            removed = store.remove_many(&ids);
            removed > 0
        });
        self.selection.clear();
        removed
    }

    pub fn delete_element(&mut self, id: ElementId) -> bool {
        self.commit(|store| store.remove(id).is_some())
    }

    /// Copy the primary element.
    pub fn copy(&mut self) -> bool {
        match self.selection.primary_element(self.history.current()) {
            Some(element) => {
                self.clipboard = Some(element.clone());
                true
            }
            None => false,
        }
    }

    pub fn paste(&mut self) -> Option<ElementId> {
        let element = self.clipboard.clone()?;
        self.add_offset_copy(element)
    }

    pub fn duplicate(&mut self) -> Option<ElementId> {
        let element = self.selection.primary_element(self.history.current())?.clone();
        self.add_offset_copy(element)
    }

    fn add_offset_copy(&mut self, mut element: Element) -> Option<ElementId> {
        element.regenerate_id();
        let offset = self.config.paste_offset;
        element.translate(Vec2::new(offset, offset));
        self.add_element(element)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.commit(|store| store.bring_forward(id))
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.commit(|store| store.send_backward(id))
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.commit(|store| store.bring_to_front(id))
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.commit(|store| store.send_to_back(id))
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        self.commit(|store| store.move_layer(from, to))
    }

    /// Layers panel drop: move `dragged` into `target`'s slot.
    pub fn drop_layer(&mut self, dragged: ElementId, target: ElementId) -> bool {
        let store = self.store();
        match (store.index_of(dragged), store.index_of(target)) {
            (Some(from), Some(to)) => self.move_layer(from, to),
            _ => false,
        }
    }

    pub fn reorder(&mut self, order: &[ElementId]) -> bool {
        self.commit(|store| store.reorder(order))
    }

    pub fn align(&mut self, op: AlignOp) -> bool {
        if self.selection.len() < MIN_ALIGN_SELECTION {
            log::debug!("align needs {MIN_ALIGN_SELECTION} selected elements");
            return false;
        }
        let moves = align::align(&self.selection.selected_elements(self.history.current()), op);
        self.commit(|store| store.translate_many(&moves))
    }

    pub fn distribute(&mut self, axis: DistributeAxis) -> bool {
        if self.selection.len() < MIN_DISTRIBUTE_SELECTION {
            log::debug!("distribute needs {MIN_DISTRIBUTE_SELECTION} selected elements");
            return false;
        }
        let selected = self.selection.selected_elements(self.history.current());
        let moves = align::distribute(&selected, axis);
        self.commit(|store| store.translate_many(&moves))
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        self.commit(|store| store.update(id, patch))
    }

    /// Set a numeric property from text typed into the property panel.
    /// Unparsable input keeps the current value.
    pub fn set_numeric_field(&mut self, id: ElementId, field: NumericField, input: &str) -> bool {
        let Some(patch) = self
            .store()
            .get(id)
            .and_then(|e| field.patch_from_input(e, input))
        else {
            return false;
        };
        self.update_element(id, &patch)
    }

    /// Hide (opacity 0) or show (opacity 1) an element.
    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        let Some(element) = self.store().get(id) else {
            return false;
        };
        let opacity = if element.style().is_hidden() { 1.0 } else { 0.0 };
        self.update_element(
            id,
            &ElementPatch {
                opacity: Some(opacity),
                ..ElementPatch::default()
            },
        )
    }

    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        let Some(element) = self.store().get(id) else {
            return false;
        };
        let locked = !element.is_locked();
        self.update_element(
            id,
            &ElementPatch {
                locked: Some(locked),
                ..ElementPatch::default()
            },
        )
    }

    /// Replace the whole document with a template's elements.
    pub fn load_template(&mut self, template: &Template) -> bool {
        let store = ElementStore::from_elements(template.instantiate());
        let changed = self.commit(|current| {
            *current = store;
            true
        });
        self.selection.clear();
        log::info!("Loaded template {} ({} elements)", template.name, template.elements.len());
        changed
    }

    /// Cancel whatever is in progress and clear the selection.
    pub fn escape(&mut self) -> bool {
        let had_interaction = self.interaction != Interaction::Idle || self.pen.is_drawing();
        self.interaction = Interaction::Idle;
        self.pen.cancel();
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        had_interaction || had_selection
    }

    pub fn execute(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Paste => self.paste().is_some(),
            EditorCommand::Duplicate => self.duplicate().is_some(),
            EditorCommand::Delete => self.delete_selected() > 0,
            EditorCommand::Escape => self.escape(),
        }
    }

    /// Handle a key press. Returns whether a shortcut fired.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: KeyModifiers,
        text_input_focused: bool,
    ) -> bool {
        match ShortcutRegistry::resolve(key, modifiers, text_input_focused) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Everything the renderer draws, back to front.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        self.store()
            .iter()
            .map(|element| {
                let self_rect = element.self_rect();
                DrawItem {
                    element,
                    selected: self.selection.contains(element.id()),
                    draggable: !element.is_locked(),
                    self_rect,
                    transform: element.node_transform(),
                    fill: resolve_fill(element, self_rect),
                    opacity: element.style().opacity,
                }
            })
            .collect()
    }
}
