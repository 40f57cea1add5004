//! The drawing-surface contract consumed by the sketch controller.

use crate::object::{CanvasObject, ObjectId};
use crate::shapes::ShapeStyle;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Lifecycle notification queued by a surface.
///
/// Surfaces queue these in the exact order they perform the mutations; the
/// controller drains them right after every operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// An object was inserted.
    Added(ObjectId),
    /// An object finished an in-place edit.
    Modified(ObjectId),
    /// An object was taken off the surface. The record travels with the event.
    Removed(CanvasObject),
}

/// Image drawn behind every object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    /// Opaque image reference (URL, data URL, asset key).
    pub source: String,
    /// Top-left anchor; resizing never moves it.
    pub anchor: Point,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

/// Everything the controller, tools and resize routine need from a surface.
pub trait Surface {
    /// Insert an object on top. Queues [`SurfaceEvent::Added`].
    fn add_object(&mut self, object: CanvasObject);

    /// Take an object off the surface. Queues [`SurfaceEvent::Removed`].
    /// Returns false when no such object is present.
    fn remove_object(&mut self, id: ObjectId) -> bool;

    fn object(&self, id: ObjectId) -> Option<&CanvasObject>;

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject>;

    /// Objects back to front.
    fn objects(&self) -> Box<dyn Iterator<Item = &CanvasObject> + '_>;

    fn objects_mut(&mut self) -> Box<dyn Iterator<Item = &mut CanvasObject> + '_>;

    /// Topmost selectable object under a point.
    fn object_at(&self, point: Point, tolerance: f64) -> Option<ObjectId>;

    /// Report that an object finished an in-place edit. Queues [`SurfaceEvent::Modified`].
    fn notify_modified(&mut self, id: ObjectId);

    /// Remove every object, queueing one removal per object.
    fn clear(&mut self);

    /// Take all queued lifecycle events, oldest first.
    fn drain_events(&mut self) -> Vec<SurfaceEvent>;

    fn size(&self) -> Size;

    fn set_size(&mut self, size: Size);

    fn background(&self) -> Option<&BackgroundImage>;

    fn background_mut(&mut self) -> Option<&mut BackgroundImage>;

    fn set_background(&mut self, background: Option<BackgroundImage>);

    fn request_redraw(&mut self);

    fn selected(&self) -> Option<ObjectId>;

    fn set_selected(&mut self, id: Option<ObjectId>);

    /// Whether the surface offers interactive selection at all.
    fn selection_enabled(&self) -> bool;

    fn set_selection_enabled(&mut self, enabled: bool);

    /// Freehand drawing mode (pointer strokes become paths).
    fn set_drawing_mode(&mut self, enabled: bool);

    /// Brush used while in drawing mode.
    fn set_brush(&mut self, style: ShapeStyle);

    /// Mark every object selectable or not.
    fn set_objects_selectable(&mut self, selectable: bool) {
        for object in self.objects_mut() {
            object.selectable = selectable;
        }
    }

    fn len(&self) -> usize {
        self.objects().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
