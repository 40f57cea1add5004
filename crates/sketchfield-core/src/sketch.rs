//! The sketch controller: tool dispatch, change tracking and undo/redo over
//! one drawing surface.

use crate::canvas::{Canvas, CanvasExport};
use crate::config::SketchConfig;
use crate::error::{SketchError, SketchResult};
use crate::history::HistoryStore;
use crate::input::PointerEvent;
use crate::object::{CanvasObject, ObjectId, ObjectState};
use crate::resize::{self, ResizeCoordinator};
use crate::surface::{BackgroundImage, Surface, SurfaceEvent};
use crate::tools::{ToolKind, ToolManager};
use crate::tracker::{ChangeTracker, Replay};
use kurbo::{Point, Size};

/// Distance, per paste, between a pasted object and its source.
pub const PASTE_OFFSET: f64 = 10.0;

/// Interactive sketch field bound to one surface.
///
/// Every operation that can mutate the surface drains its lifecycle events
/// before returning, so history entries are kept in the order the edits
/// happened.
#[derive(Debug)]
pub struct SketchField<S: Surface = Canvas> {
    surface: S,
    tools: ToolManager,
    history: HistoryStore,
    tracker: ChangeTracker,
    config: SketchConfig,
    resizer: ResizeCoordinator,
    clipboard: Option<ObjectState>,
    paste_count: u32,
}

impl<S: Surface> SketchField<S> {
    /// Bind a controller to `surface`.
    ///
    /// Objects already on the surface are not part of the history. The
    /// configured tool is activated; an unknown name leaves no tool active.
    pub fn new(mut surface: S, config: SketchConfig) -> SketchResult<Self> {
        let pending = surface.drain_events();
        if !pending.is_empty() {
            log::debug!("Discarding {} surface event(s) from before start-up", pending.len());
        }
        let mut tools = ToolManager::new();
        tools.configure(config.tool_options(), &mut surface);

        let resizer = ResizeCoordinator::new(surface.size());
        let mut field = Self {
            surface,
            resizer,
            tools,
            history: HistoryStore::new(config.undo_steps),
            tracker: ChangeTracker::new(),
            config,
            clipboard: None,
            paste_count: 0,
        };
        let tool = field.config.tool.clone();
        field.set_active_tool(&tool)?;
        Ok(field)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Tool receiving pointer events, if any.
    pub fn current_tool(&self) -> Option<ToolKind> {
        self.tools.current_tool()
    }

    /// Mutate the surface directly; whatever it reports is recorded afterwards.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> SketchResult<R> {
        let result = f(&mut self.surface);
        self.sync(None)?;
        Ok(result)
    }

    fn sync(&mut self, replay: Option<Replay>) -> SketchResult<()> {
        self.tracker.sync(&mut self.surface, &mut self.history, replay)
    }

    /// Activate a tool by name.
    ///
    /// An unknown name is not an error: it is logged and pointer input is
    /// ignored until a known tool is selected.
    pub fn set_active_tool(&mut self, name: &str) -> SketchResult<()> {
        self.config.tool = name.to_string();
        let kind = match name.parse::<ToolKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                log::warn!("{}; pointer input is ignored until a known tool is set", err);
                None
            }
        };
        self.activate(kind)
    }

    /// Activate a tool.
    pub fn set_tool(&mut self, kind: ToolKind) -> SketchResult<()> {
        self.activate(Some(kind))
    }

    fn activate(&mut self, kind: Option<ToolKind>) -> SketchResult<()> {
        let result = self.tools.set_tool(kind, &mut self.surface);
        self.sync(None)?;
        if let Some(kind) = kind {
            self.config.tool = kind.name().to_string();
        }
        result
    }

    /// Apply new settings. The history capacity is fixed at construction.
    pub fn configure(&mut self, config: SketchConfig) -> SketchResult<()> {
        let capacity = self.history.capacity();
        if config.undo_steps != capacity {
            log::info!(
                "undoSteps is fixed once the sketch field is created; keeping {}",
                capacity
            );
        }
        let tool_changed = config.tool.parse::<ToolKind>().ok() != self.current_tool();
        self.config = SketchConfig {
            undo_steps: capacity,
            ..config
        };
        self.tools.configure(self.config.tool_options(), &mut self.surface);
        if tool_changed {
            let tool = self.config.tool.clone();
            self.set_active_tool(&tool)?;
        }
        Ok(())
    }

    /// Route a pointer event to the active tool and record what it changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SketchResult<()> {
        let result = self.tools.dispatch(&event, &mut self.surface);
        self.sync(None)?;
        result
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the entry at the history cursor.
    ///
    /// Nothing moves unless the entry's object can be found and its snapshot
    /// decoded.
    pub fn undo(&mut self) -> SketchResult<()> {
        let entry = self.history.current()?.clone();
        let id = entry.object;

        if let Some(object) = self.surface.object(id) {
            if object.version() <= 1 {
                self.history.undo()?;
                self.surface.remove_object(id);
                log::debug!("Undid creation of {}", id);
                return self.sync(Some(Replay::Uncreate(id)));
            }
            let state = ObjectState::decode(&entry.previous)?;
            self.history.undo()?;
            if let Some(object) = self.surface.object_mut(id) {
                object.apply_state(state, entry.previous);
                object.set_version(object.version() - 1);
            }
            self.surface.request_redraw();
            return self.sync(None);
        }

        let restore_version = self
            .tracker
            .detached(id)
            .map(|detached| detached.restore_version)
            .ok_or(SketchError::ObjectNotFound(id))?;
        if restore_version <= 1 {
            // Creation of an object that is already off the surface.
            self.history.undo()?;
            if let Some(detached) = self.tracker.detached_mut(id) {
                detached.restore_version = 0;
            }
            return Ok(());
        }

        let state = ObjectState::decode(&entry.previous)?;
        let mut detached = self
            .tracker
            .take_detached(id)
            .ok_or(SketchError::ObjectNotFound(id))?;
        self.history.undo()?;
        detached.object.set_version(restore_version - 1);
        detached.object.apply_state(state, entry.previous);
        self.reinsert(detached.object);
        self.surface.request_redraw();
        log::debug!("Restored {} to version {}", id, restore_version - 1);
        self.sync(Some(Replay::Reinsert(id)))
    }

    /// Re-apply the entry after the history cursor.
    pub fn redo(&mut self) -> SketchResult<()> {
        let entry = self.history.peek_redo()?.clone();
        let id = entry.object;

        if self.surface.object(id).is_some() {
            let state = ObjectState::decode(&entry.current)?;
            self.history.redo()?;
            if let Some(object) = self.surface.object_mut(id) {
                object.apply_state(state, entry.current);
                object.set_version(object.version() + 1);
            }
            self.surface.request_redraw();
            return self.sync(None);
        }

        let restore_version = self
            .tracker
            .detached(id)
            .map(|detached| detached.restore_version)
            .ok_or(SketchError::ObjectNotFound(id))?;
        let state = if restore_version > 0 {
            Some(ObjectState::decode(&entry.current)?)
        } else {
            None
        };
        let mut detached = self
            .tracker
            .take_detached(id)
            .ok_or(SketchError::ObjectNotFound(id))?;
        self.history.redo()?;
        detached.object.set_version(restore_version + 1);
        if let Some(state) = state {
            detached.object.apply_state(state, entry.current);
        }
        self.reinsert(detached.object);
        self.surface.request_redraw();
        log::debug!("Re-inserted {} at version {}", id, restore_version + 1);
        self.sync(Some(Replay::Reinsert(id)))
    }

    /// Put an object (back) on the surface, pickable only if the active tool
    /// allows selection.
    fn reinsert(&mut self, mut object: CanvasObject) {
        object.selectable = self.surface.selection_enabled();
        self.surface.add_object(object);
    }

    /// Remove every object and forget all history. Returns the discarded
    /// objects, back to front.
    pub fn clear(&mut self) -> Vec<CanvasObject> {
        self.surface.clear();
        let discarded: Vec<CanvasObject> = self
            .surface
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Removed(mut object) => {
                    object.set_version(0);
                    Some(object)
                }
                _ => None,
            })
            .collect();
        self.history.clear();
        self.tracker.clear();
        self.surface.request_redraw();
        log::info!("Cleared {} object(s)", discarded.len());
        discarded
    }

    /// The host's container changed size.
    pub fn on_resize(&mut self, width: f64, height: f64) -> SketchResult<()> {
        self.resizer.resize(
            &mut self.surface,
            Size::new(width, height),
            self.config.scale_on_resize,
        )?;
        self.sync(None)
    }

    /// Scale every object about the surface origin.
    pub fn zoom(&mut self, factor: f64) -> SketchResult<()> {
        resize::zoom(&mut self.surface, factor)?;
        self.sync(None)
    }

    /// Take the selected object off the surface. Returns false when nothing
    /// is selected.
    pub fn remove_selected(&mut self) -> SketchResult<bool> {
        let Some(id) = self.surface.selected() else {
            return Ok(false);
        };
        let removed = self.surface.remove_object(id);
        self.surface.request_redraw();
        self.sync(None)?;
        Ok(removed)
    }

    /// Remember the selected object's state for [`paste`](Self::paste).
    pub fn copy(&mut self) -> bool {
        let Some(object) = self.surface.selected().and_then(|id| self.surface.object(id)) else {
            return false;
        };
        self.clipboard = Some(object.state());
        self.paste_count = 0;
        true
    }

    /// Add a new object from the clipboard, shifted a little further on
    /// every paste, and select it.
    pub fn paste(&mut self) -> SketchResult<Option<ObjectId>> {
        let Some(state) = self.clipboard.clone() else {
            return Ok(None);
        };
        self.paste_count += 1;
        let offset = PASTE_OFFSET * f64::from(self.paste_count);
        let mut placement = state.placement;
        placement.left += offset;
        placement.top += offset;

        let object = CanvasObject::new(state.shape, placement);
        let id = object.id();
        self.reinsert(object);
        self.surface.set_selected(Some(id));
        self.surface.request_redraw();
        self.sync(None)?;
        Ok(Some(id))
    }

    /// Show an image behind the drawing, anchored at the surface origin.
    pub fn set_background_image(&mut self, source: impl Into<String>, width: f64, height: f64) {
        self.surface.set_background(Some(BackgroundImage {
            source: source.into(),
            anchor: Point::ZERO,
            width,
            height,
        }));
        self.surface.request_redraw();
    }

    /// Serialize the surface as a pretty-printed JSON document.
    pub fn to_json(&self) -> SketchResult<String> {
        Ok(serde_json::to_string_pretty(&CanvasExport::from_surface(&self.surface))?)
    }

    /// Add every object described by a JSON document, each as its own
    /// undoable addition. Returns the new ids in document order.
    pub fn from_json(&mut self, json: &str) -> SketchResult<Vec<ObjectId>> {
        let document: CanvasExport =
            serde_json::from_str(json).map_err(|e| SketchError::Config(e.to_string()))?;
        if let Some(background) = document.background {
            self.surface.set_background(Some(background));
        }
        let mut ids = Vec::with_capacity(document.objects.len());
        for state in document.objects {
            let object = CanvasObject::new(state.shape, state.placement);
            ids.push(object.id());
            self.reinsert(object);
        }
        self.surface.request_redraw();
        self.sync(None)?;
        log::info!("Loaded {} object(s)", ids.len());
        Ok(ids)
    }
}
