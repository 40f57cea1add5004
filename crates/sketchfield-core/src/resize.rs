//! Keeping the drawing proportional when the surface changes size.

use crate::error::SketchResult;
use crate::surface::Surface;
use kurbo::Size;

fn has_area(size: Size) -> bool {
    size.width.abs() >= f64::EPSILON && size.height.abs() >= f64::EPSILON
}

/// Stretch factors taking `old` to `new`, or `None` when either size has no
/// area.
pub fn scale_factors(old: Size, new: Size) -> Option<(f64, f64)> {
    if !has_area(old) || !has_area(new) {
        return None;
    }
    Some((new.width / old.width, new.height / old.height))
}

/// Tracks the size the drawing's geometry currently matches.
///
/// A surface that collapses to a zero dimension keeps its geometry; the next
/// resize with area scales from the last size that had one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeCoordinator {
    base: Option<Size>,
}

impl ResizeCoordinator {
    /// Start from the surface's current size.
    pub fn new(initial: Size) -> Self {
        Self {
            base: has_area(initial).then_some(initial),
        }
    }

    /// Size the geometry was last laid out for.
    pub fn base(&self) -> Option<Size> {
        self.base
    }

    /// Resize the surface to `new_size`.
    ///
    /// With `scale_objects` set, the background and every object are
    /// stretched by the same per-axis factors so the drawing keeps its
    /// proportions. The background anchor never moves.
    pub fn resize<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        new_size: Size,
        scale_objects: bool,
    ) -> SketchResult<()> {
        surface.set_size(new_size);
        if !has_area(new_size) {
            log::debug!(
                "Surface collapsed to {}x{}; geometry left as is",
                new_size.width,
                new_size.height
            );
            return Ok(());
        }
        let base = self.base.replace(new_size);
        if !scale_objects {
            return Ok(());
        }
        let Some((width_factor, height_factor)) =
            base.and_then(|base| scale_factors(base, new_size))
        else {
            log::debug!("No earlier size to scale from; resized without scaling");
            return Ok(());
        };

        if let Some(background) = surface.background_mut() {
            background.width *= width_factor;
            background.height *= height_factor;
        }
        scale_all(surface, width_factor, height_factor)
    }
}

/// One-off resize scaling from the surface's current size.
pub fn rescale<S: Surface + ?Sized>(
    surface: &mut S,
    new_size: Size,
    scale_objects: bool,
) -> SketchResult<()> {
    ResizeCoordinator::new(surface.size()).resize(surface, new_size, scale_objects)
}

/// Scale every object and the background uniformly about the surface origin.
/// Non-positive factors are ignored.
pub fn zoom<S: Surface + ?Sized>(surface: &mut S, factor: f64) -> SketchResult<()> {
    if factor <= 0.0 || !factor.is_finite() {
        log::warn!("Ignoring zoom factor {}", factor);
        return Ok(());
    }
    if let Some(background) = surface.background_mut() {
        background.width *= factor;
        background.height *= factor;
    }
    scale_all(surface, factor, factor)
}

fn scale_all<S: Surface + ?Sized>(
    surface: &mut S,
    width_factor: f64,
    height_factor: f64,
) -> SketchResult<()> {
    for object in surface.objects_mut() {
        object.placement.scale_by(width_factor, height_factor);
        object.set_coords();
        object.save_state()?;
    }
    surface.request_redraw();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::object::{CanvasObject, Placement};
    use crate::shapes::{Rectangle, Shape};
    use crate::surface::BackgroundImage;
    use kurbo::{Point, Rect};

    fn canvas_with_rect() -> (Canvas, crate::object::ObjectId) {
        let mut canvas = Canvas::with_size(400.0, 300.0);
        let object = CanvasObject::new(
            Shape::Rectangle(Rectangle::new(40.0, 20.0)),
            Placement::at(Point::new(100.0, 50.0)),
        );
        let id = object.id();
        canvas.add_object(object);
        canvas.set_background(Some(BackgroundImage {
            source: "paper.png".to_string(),
            anchor: Point::new(5.0, 5.0),
            width: 400.0,
            height: 300.0,
        }));
        (canvas, id)
    }

    #[test]
    fn test_scale_factors() {
        let factors = scale_factors(Size::new(100.0, 50.0), Size::new(200.0, 25.0));
        assert_eq!(factors, Some((2.0, 0.5)));
        assert_eq!(scale_factors(Size::new(0.0, 50.0), Size::new(10.0, 10.0)), None);
        assert_eq!(scale_factors(Size::new(10.0, 50.0), Size::new(10.0, 0.0)), None);
    }

    #[test]
    fn test_rescale_width_only() {
        let (mut canvas, id) = canvas_with_rect();
        rescale(&mut canvas, Size::new(800.0, 300.0), true).unwrap();

        let object = canvas.object(id).unwrap();
        let p = object.placement;
        assert!((p.left - 200.0).abs() < f64::EPSILON);
        assert!((p.scale_x - 2.0).abs() < f64::EPSILON);
        assert!((p.top - 50.0).abs() < f64::EPSILON);
        assert!((p.scale_y - 1.0).abs() < f64::EPSILON);
        assert_eq!(object.coords(), Rect::new(200.0, 50.0, 280.0, 70.0));
        assert_eq!(object.committed(), Some(&object.snapshot().unwrap()));

        let background = canvas.background().unwrap();
        assert!((background.width - 800.0).abs() < f64::EPSILON);
        assert!((background.height - 300.0).abs() < f64::EPSILON);
        assert_eq!(background.anchor, Point::new(5.0, 5.0));
        assert_eq!(canvas.size(), Size::new(800.0, 300.0));
    }

    #[test]
    fn test_rescale_disabled_keeps_geometry() {
        let (mut canvas, id) = canvas_with_rect();
        let before = canvas.object(id).unwrap().clone();
        let background = canvas.background().cloned();

        rescale(&mut canvas, Size::new(1000.0, 10.0), false).unwrap();

        assert_eq!(canvas.object(id).unwrap(), &before);
        assert_eq!(canvas.background().cloned(), background);
        assert_eq!(canvas.size(), Size::new(1000.0, 10.0));
    }

    #[test]
    fn test_rescale_from_empty_size() {
        let mut canvas = Canvas::with_size(0.0, 0.0);
        let object = CanvasObject::new(
            Shape::Rectangle(Rectangle::new(10.0, 10.0)),
            Placement::at(Point::new(3.0, 4.0)),
        );
        let id = object.id();
        canvas.add_object(object);

        rescale(&mut canvas, Size::new(640.0, 480.0), true).unwrap();
        assert!((canvas.object(id).unwrap().placement.left - 3.0).abs() < f64::EPSILON);
        assert_eq!(canvas.size(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_collapse_and_restore_keeps_geometry() {
        let mut canvas = Canvas::with_size(800.0, 600.0);
        let object = CanvasObject::new(
            Shape::Rectangle(Rectangle::new(10.0, 10.0)),
            Placement::at(Point::new(100.0, 100.0)),
        );
        let id = object.id();
        canvas.add_object(object);
        let mut coordinator = ResizeCoordinator::new(canvas.size());

        coordinator.resize(&mut canvas, Size::new(0.0, 600.0), true).unwrap();
        assert_eq!(canvas.size(), Size::new(0.0, 600.0));
        assert_eq!(coordinator.base(), Some(Size::new(800.0, 600.0)));
        coordinator.resize(&mut canvas, Size::new(800.0, 600.0), true).unwrap();

        let p = canvas.object(id).unwrap().placement;
        assert!((p.left - 100.0).abs() < f64::EPSILON);
        assert!((p.scale_x - 1.0).abs() < f64::EPSILON);

        // Growing after the collapse scales from the last real size.
        coordinator.resize(&mut canvas, Size::new(0.0, 0.0), true).unwrap();
        coordinator.resize(&mut canvas, Size::new(1600.0, 600.0), true).unwrap();
        let p = canvas.object(id).unwrap().placement;
        assert!((p.left - 200.0).abs() < f64::EPSILON);
        assert!((p.scale_x - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unscaled_resize_moves_the_base() {
        let (mut canvas, id) = canvas_with_rect();
        let mut coordinator = ResizeCoordinator::new(canvas.size());
        coordinator.resize(&mut canvas, Size::new(800.0, 300.0), false).unwrap();
        coordinator.resize(&mut canvas, Size::new(400.0, 300.0), true).unwrap();

        let p = canvas.object(id).unwrap().placement;
        assert!((p.left - 50.0).abs() < f64::EPSILON);
        assert!((p.scale_x - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_uniform() {
        let (mut canvas, id) = canvas_with_rect();
        zoom(&mut canvas, 0.5).unwrap();

        let p = canvas.object(id).unwrap().placement;
        assert!((p.left - 50.0).abs() < f64::EPSILON);
        assert!((p.top - 25.0).abs() < f64::EPSILON);
        assert!((p.scale_x - 0.5).abs() < f64::EPSILON);
        assert!((p.scale_y - 0.5).abs() < f64::EPSILON);
        // Zoom leaves the surface size alone.
        assert_eq!(canvas.size(), Size::new(400.0, 300.0));
    }

    #[test]
    fn test_zoom_ignores_non_positive() {
        let (mut canvas, id) = canvas_with_rect();
        let before = canvas.object(id).unwrap().clone();
        zoom(&mut canvas, 0.0).unwrap();
        zoom(&mut canvas, -2.0).unwrap();
        assert_eq!(canvas.object(id).unwrap(), &before);
    }
}
