//! In-memory drawing surface.

use crate::object::{CanvasObject, ObjectId, ObjectState};
use crate::shapes::ShapeStyle;
use crate::surface::{BackgroundImage, Surface, SurfaceEvent};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Default surface size before the host reports one.
pub const DEFAULT_SIZE: Size = Size::new(800.0, 600.0);

/// Serializable picture of a surface: its size and every object's state in z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasExport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub background: Option<BackgroundImage>,
    pub objects: Vec<ObjectState>,
}

impl CanvasExport {
    /// Capture any surface's size, background and object states.
    pub fn from_surface<S: Surface + ?Sized>(surface: &S) -> Self {
        let size = surface.size();
        Self {
            width: size.width,
            height: size.height,
            background: surface.background().cloned(),
            objects: surface.objects().map(CanvasObject::state).collect(),
        }
    }
}

/// A surface that keeps its objects in memory and queues lifecycle events.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Objects in z-order (back to front).
    objects: Vec<CanvasObject>,
    size: Size,
    background: Option<BackgroundImage>,
    selected: Option<ObjectId>,
    selection_enabled: bool,
    drawing_mode: bool,
    brush: ShapeStyle,
    events: Vec<SurfaceEvent>,
    redraw_requests: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas of the default size.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SIZE.width, DEFAULT_SIZE.height)
    }

    /// Create an empty canvas of the given size.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            objects: Vec::new(),
            size: Size::new(width, height),
            background: None,
            selected: None,
            selection_enabled: true,
            drawing_mode: false,
            brush: ShapeStyle::default(),
            events: Vec::new(),
            redraw_requests: 0,
        }
    }

    /// Whether freehand drawing mode is on.
    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    /// Brush used in drawing mode.
    pub fn brush(&self) -> &ShapeStyle {
        &self.brush
    }

    /// Number of redraws requested so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Ids in z-order (back to front).
    pub fn z_order(&self) -> Vec<ObjectId> {
        self.objects.iter().map(CanvasObject::id).collect()
    }

    /// Bounding box of every object.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .map(CanvasObject::coords)
            .reduce(|acc, r| acc.union(r))
    }

    /// Picture of the current surface for export.
    pub fn export(&self) -> CanvasExport {
        CanvasExport::from_surface(self)
    }

    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }
}

impl Surface for Canvas {
    fn add_object(&mut self, object: CanvasObject) {
        let id = object.id();
        if self.position(id).is_some() {
            log::warn!("Object {} is already on the canvas; ignoring add", id);
            return;
        }
        self.objects.push(object);
        self.events.push(SurfaceEvent::Added(id));
    }

    fn remove_object(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let object = self.objects.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.events.push(SurfaceEvent::Removed(object));
        true
    }

    fn object(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    fn objects(&self) -> Box<dyn Iterator<Item = &CanvasObject> + '_> {
        Box::new(self.objects.iter())
    }

    fn objects_mut(&mut self) -> Box<dyn Iterator<Item = &mut CanvasObject> + '_> {
        Box::new(self.objects.iter_mut())
    }

    fn object_at(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        // Front to back for selection priority
        self.objects
            .iter()
            .rev()
            .find(|o| o.selectable && o.hit_test(point, tolerance))
            .map(CanvasObject::id)
    }

    fn notify_modified(&mut self, id: ObjectId) {
        if self.position(id).is_some() {
            self.events.push(SurfaceEvent::Modified(id));
        }
    }

    fn clear(&mut self) {
        self.selected = None;
        for object in self.objects.drain(..) {
            self.events.push(SurfaceEvent::Removed(object));
        }
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    fn background_mut(&mut self) -> Option<&mut BackgroundImage> {
        self.background.as_mut()
    }

    fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    fn set_selected(&mut self, id: Option<ObjectId>) {
        self.selected = id.filter(|id| self.position(*id).is_some());
    }

    fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
        if !enabled {
            self.selected = None;
        }
    }

    fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
    }

    fn set_brush(&mut self, style: ShapeStyle) {
        self.brush = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Placement;
    use crate::shapes::{Rectangle, Shape};

    fn rect_at(x: f64, y: f64) -> CanvasObject {
        let mut shape = Rectangle::new(100.0, 100.0);
        shape.style.fill_color = Some(crate::shapes::SerializableColor::white());
        CanvasObject::new(Shape::Rectangle(shape), Placement::at(Point::new(x, y)))
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.size(), DEFAULT_SIZE);
    }

    #[test]
    fn test_add_queues_event() {
        let mut canvas = Canvas::new();
        let object = rect_at(0.0, 0.0);
        let id = object.id();

        canvas.add_object(object);
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.drain_events(), vec![SurfaceEvent::Added(id)]);
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn test_duplicate_add_ignored() {
        let mut canvas = Canvas::new();
        let object = rect_at(0.0, 0.0);
        canvas.add_object(object.clone());
        canvas.add_object(object);
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.drain_events().len(), 1);
    }

    #[test]
    fn test_remove_carries_object() {
        let mut canvas = Canvas::new();
        let object = rect_at(0.0, 0.0);
        let id = object.id();
        canvas.add_object(object);
        canvas.set_selected(Some(id));
        canvas.drain_events();

        assert!(canvas.remove_object(id));
        assert!(canvas.is_empty());
        assert_eq!(canvas.selected(), None);
        match canvas.drain_events().as_slice() {
            [SurfaceEvent::Removed(removed)] => assert_eq!(removed.id(), id),
            other => panic!("unexpected events: {:?}", other),
        }
        assert!(!canvas.remove_object(id));
    }

    #[test]
    fn test_object_at_prefers_front() {
        let mut canvas = Canvas::new();
        let back = rect_at(0.0, 0.0);
        let front = rect_at(50.0, 50.0);
        let (back_id, front_id) = (back.id(), front.id());
        canvas.add_object(back);
        canvas.add_object(front);

        assert_eq!(canvas.object_at(Point::new(75.0, 75.0), 0.0), Some(front_id));
        assert_eq!(canvas.object_at(Point::new(25.0, 25.0), 0.0), Some(back_id));

        canvas.set_objects_selectable(false);
        assert_eq!(canvas.object_at(Point::new(25.0, 25.0), 0.0), None);
    }

    #[test]
    fn test_notify_modified_only_for_present_objects() {
        let mut canvas = Canvas::new();
        let object = rect_at(0.0, 0.0);
        let id = object.id();
        canvas.notify_modified(id);
        assert!(canvas.drain_events().is_empty());

        canvas.add_object(object);
        canvas.notify_modified(id);
        assert_eq!(
            canvas.drain_events(),
            vec![SurfaceEvent::Added(id), SurfaceEvent::Modified(id)]
        );
    }

    #[test]
    fn test_clear_removes_in_order() {
        let mut canvas = Canvas::new();
        let a = rect_at(0.0, 0.0);
        let b = rect_at(10.0, 10.0);
        let ids = vec![a.id(), b.id()];
        canvas.add_object(a);
        canvas.add_object(b);
        canvas.drain_events();

        canvas.clear();
        let removed: Vec<_> = canvas
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Removed(o) => Some(o.id()),
                _ => None,
            })
            .collect();
        assert_eq!(removed, ids);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_export_lists_states() {
        let mut canvas = Canvas::with_size(320.0, 240.0);
        canvas.add_object(rect_at(5.0, 6.0));
        let export = canvas.export();
        assert!((export.width - 320.0).abs() < f64::EPSILON);
        assert_eq!(export.objects.len(), 1);
        assert!((export.objects[0].placement.left - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_union() {
        let mut canvas = Canvas::new();
        assert!(canvas.bounds().is_none());
        canvas.add_object(rect_at(0.0, 0.0));
        canvas.add_object(rect_at(50.0, 50.0));
        assert_eq!(canvas.bounds(), Some(Rect::new(0.0, 0.0, 150.0, 150.0)));
    }
}
