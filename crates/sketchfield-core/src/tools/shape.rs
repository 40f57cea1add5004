//! Drag-to-size shape tools: line, rectangle and circle.

use super::{Tool, ToolOptions};
use crate::error::SketchResult;
use crate::input::PointerInput;
use crate::object::{CanvasObject, ObjectId, Placement};
use crate::shapes::{Ellipse, Line, Rectangle, Shape, ShapeStyle};
use crate::surface::Surface;
use kurbo::Point;

/// A shape being sized by a drag.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    id: ObjectId,
    start: Point,
}

/// Surface setup shared by the shape tools: no freehand, no selection.
fn configure_for_shapes(surface: &mut dyn Surface) {
    surface.set_drawing_mode(false);
    surface.set_selection_enabled(false);
    surface.set_objects_selectable(false);
}

/// Put a fresh, zero-sized shape on the surface and start tracking it.
fn begin(surface: &mut dyn Surface, shape: Shape, start: Point) -> Gesture {
    let mut object = CanvasObject::new(shape, Placement::at(start));
    object.selectable = false;
    let id = object.id();
    surface.add_object(object);
    Gesture { id, start }
}

/// Resize the tracked shape in place. No lifecycle event is raised.
fn update(
    surface: &mut dyn Surface,
    gesture: Option<Gesture>,
    point: Point,
    resize: impl FnOnce(&mut CanvasObject, Point, Point),
) {
    let Some(gesture) = gesture else { return };
    let Some(object) = surface.object_mut(gesture.id) else {
        return;
    };
    resize(object, gesture.start, point);
    object.set_coords();
    surface.request_redraw();
}

/// Commit the final geometry as the object's saved state.
fn finish(surface: &mut dyn Surface, gesture: Option<Gesture>) -> SketchResult<()> {
    let Some(gesture) = gesture else {
        return Ok(());
    };
    if let Some(object) = surface.object_mut(gesture.id) {
        object.save_state()?;
    }
    Ok(())
}

/// Corner of the square spanning `start` and `point` along the longer side.
fn square_corner(start: Point, point: Point) -> Point {
    let delta = point - start;
    let side = delta.x.abs().max(delta.y.abs());
    Point::new(
        start.x + side.copysign(delta.x),
        start.y + side.copysign(delta.y),
    )
}

/// Draws straight lines from the press point to the release point.
#[derive(Debug, Default)]
pub struct LineTool {
    style: ShapeStyle,
    gesture: Option<Gesture>,
}

impl Tool for LineTool {
    fn configure(&mut self, surface: &mut dyn Surface, options: &ToolOptions) {
        configure_for_shapes(surface);
        self.style = options.style.clone();
    }

    fn on_pointer_down(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let mut line = Line::new(Point::ZERO, Point::ZERO);
        line.style = self.style.clone();
        self.gesture = Some(begin(surface, Shape::Line(line), input.position));
        Ok(())
    }

    fn on_pointer_move(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        update(surface, self.gesture, input.position, |object, start, point| {
            if let Shape::Line(line) = &mut object.shape {
                line.end = (point - start).to_point();
            }
        });
        Ok(())
    }

    fn on_pointer_up(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn on_pointer_leave(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn cancel(&mut self, surface: &mut dyn Surface) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }
}

/// Draws axis-aligned rectangles spanning the drag.
#[derive(Debug, Default)]
pub struct RectangleTool {
    style: ShapeStyle,
    gesture: Option<Gesture>,
}

impl Tool for RectangleTool {
    fn configure(&mut self, surface: &mut dyn Surface, options: &ToolOptions) {
        configure_for_shapes(surface);
        self.style = options.style.clone();
    }

    fn on_pointer_down(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let mut rect = Rectangle::new(0.0, 0.0);
        rect.style = self.style.clone();
        self.gesture = Some(begin(surface, Shape::Rectangle(rect), input.position));
        Ok(())
    }

    fn on_pointer_move(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let point = match self.gesture {
            Some(gesture) if input.modifiers.shift => square_corner(gesture.start, input.position),
            _ => input.position,
        };
        update(surface, self.gesture, point, |object, start, point| {
            if let Shape::Rectangle(rect) = &mut object.shape {
                // Dragging up or left moves the anchor.
                object.placement.left = start.x.min(point.x);
                object.placement.top = start.y.min(point.y);
                rect.width = (point.x - start.x).abs();
                rect.height = (point.y - start.y).abs();
            }
        });
        Ok(())
    }

    fn on_pointer_up(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn on_pointer_leave(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn cancel(&mut self, surface: &mut dyn Surface) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }
}

/// Draws circles whose diameter is the drag segment.
#[derive(Debug, Default)]
pub struct CircleTool {
    style: ShapeStyle,
    gesture: Option<Gesture>,
}

impl Tool for CircleTool {
    fn configure(&mut self, surface: &mut dyn Surface, options: &ToolOptions) {
        configure_for_shapes(surface);
        self.style = options.style.clone();
    }

    fn on_pointer_down(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let mut circle = Ellipse::circle(0.0);
        circle.style = self.style.clone();
        self.gesture = Some(begin(surface, Shape::Ellipse(circle), input.position));
        Ok(())
    }

    fn on_pointer_move(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        update(surface, self.gesture, input.position, |object, start, point| {
            if let Shape::Ellipse(circle) = &mut object.shape {
                let radius = (point - start).hypot() / 2.0;
                let center = start.midpoint(point);
                circle.radius_x = radius;
                circle.radius_y = radius;
                object.placement.left = center.x - radius;
                object.placement.top = center.y - radius;
            }
        });
        Ok(())
    }

    fn on_pointer_up(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn on_pointer_leave(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }

    fn cancel(&mut self, surface: &mut dyn Surface) -> SketchResult<()> {
        finish(surface, self.gesture.take())
    }
}
