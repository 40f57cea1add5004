//! Freehand pencil tool.

use super::{Tool, ToolOptions};
use crate::error::SketchResult;
use crate::input::PointerInput;
use crate::object::{CanvasObject, Placement};
use crate::shapes::{Freehand, Shape, ShapeStyle};
use crate::surface::Surface;
use kurbo::{Point, Rect};

/// Collects a stroke while the pointer is down and drops it on the surface
/// as one freehand path when the pointer is released.
#[derive(Debug, Default)]
pub struct PencilTool {
    style: ShapeStyle,
    points: Vec<Point>,
    drawing: bool,
}

impl PencilTool {
    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    fn finish(&mut self, surface: &mut dyn Surface) -> SketchResult<()> {
        if !self.drawing {
            return Ok(());
        }
        self.drawing = false;
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            log::trace!("Discarding stroke with {} point(s)", points.len());
            return Ok(());
        }

        let origin = points
            .iter()
            .fold(Rect::from_points(points[0], points[0]), |acc, p| acc.union_pt(*p))
            .origin();
        let local = points.iter().map(|p| (*p - origin).to_point()).collect();

        let mut path = Freehand::from_points(local);
        path.style = self.style.clone();
        let mut object = CanvasObject::new(Shape::Freehand(path), Placement::at(origin));
        object.selectable = surface.selection_enabled();
        object.save_state()?;
        surface.add_object(object);
        surface.request_redraw();
        Ok(())
    }
}

impl Tool for PencilTool {
    fn configure(&mut self, surface: &mut dyn Surface, options: &ToolOptions) {
        surface.set_selection_enabled(false);
        surface.set_objects_selectable(false);
        surface.set_drawing_mode(true);
        surface.set_brush(options.style.clone());
        self.style = options.style.clone();
    }

    fn on_pointer_down(&mut self, _surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        self.points.clear();
        self.points.push(input.position);
        self.drawing = true;
        Ok(())
    }

    fn on_pointer_move(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        if self.drawing {
            self.points.push(input.position);
            surface.request_redraw();
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        if self.drawing && self.points.last() != Some(&input.position) {
            self.points.push(input.position);
        }
        self.finish(surface)
    }

    fn on_pointer_leave(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        self.finish(surface)
    }

    fn cancel(&mut self, _surface: &mut dyn Surface) -> SketchResult<()> {
        self.points.clear();
        self.drawing = false;
        Ok(())
    }
}
