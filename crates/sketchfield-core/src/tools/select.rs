//! Selection and dragging of existing objects.

use super::{Tool, ToolOptions, HIT_TOLERANCE};
use crate::error::SketchResult;
use crate::input::PointerInput;
use crate::object::ObjectId;
use crate::surface::Surface;
use kurbo::Point;

#[derive(Debug, Clone, Copy)]
struct Drag {
    id: ObjectId,
    last: Point,
    moved: bool,
}

/// Picks the topmost object under the pointer and drags it around.
///
/// A finished drag is reported to the surface as a modification, which is
/// what turns it into an undoable step.
#[derive(Debug, Default)]
pub struct SelectTool {
    drag: Option<Drag>,
}

impl SelectTool {
    fn finish(&mut self, surface: &mut dyn Surface) {
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                surface.notify_modified(drag.id);
            }
        }
    }
}

impl Tool for SelectTool {
    fn configure(&mut self, surface: &mut dyn Surface, _options: &ToolOptions) {
        surface.set_drawing_mode(false);
        surface.set_selection_enabled(true);
        surface.set_objects_selectable(true);
    }

    fn on_pointer_down(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let hit = surface.object_at(input.position, HIT_TOLERANCE);
        surface.set_selected(hit);
        self.drag = hit.map(|id| Drag {
            id,
            last: input.position,
            moved: false,
        });
        surface.request_redraw();
        Ok(())
    }

    fn on_pointer_move(&mut self, surface: &mut dyn Surface, input: &PointerInput) -> SketchResult<()> {
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        let delta = input.position - drag.last;
        if delta.hypot2() < f64::EPSILON {
            return Ok(());
        }
        if let Some(object) = surface.object_mut(drag.id) {
            object.placement.left += delta.x;
            object.placement.top += delta.y;
            object.set_coords();
            drag.last = input.position;
            drag.moved = true;
            surface.request_redraw();
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        self.finish(surface);
        Ok(())
    }

    fn on_pointer_leave(&mut self, surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        self.finish(surface);
        Ok(())
    }

    fn cancel(&mut self, surface: &mut dyn Surface) -> SketchResult<()> {
        self.finish(surface);
        Ok(())
    }
}
