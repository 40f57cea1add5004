//! Drawable objects living on the surface.

use crate::error::SketchResult;
use crate::shapes::Shape;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for objects on the surface.
pub type ObjectId = Uuid;

/// Position and stretch of an object on the surface.
///
/// The rendered geometry is `translate(left, top) * scale(scale_x, scale_y)`
/// applied to the shape's local geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Placement {
    /// Unscaled placement at the given position.
    pub fn at(position: Point) -> Self {
        Self {
            left: position.x,
            top: position.y,
            ..Self::default()
        }
    }

    /// Local-to-surface transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Stretch position and scale independently along each axis.
    pub fn scale_by(&mut self, width_factor: f64, height_factor: f64) {
        self.left *= width_factor;
        self.scale_x *= width_factor;
        self.top *= height_factor;
        self.scale_y *= height_factor;
    }
}

/// Opaque serialized state of an object.
///
/// The history only stores, compares and hands these back; only
/// [`CanvasObject`] knows how to produce and read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// The part of an object that snapshots capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub shape: Shape,
    pub placement: Placement,
}

impl ObjectState {
    /// Encode into an opaque snapshot.
    pub fn encode(&self) -> SketchResult<Snapshot> {
        Ok(Snapshot(serde_json::to_value(self)?))
    }

    /// Decode an opaque snapshot.
    pub fn decode(snapshot: &Snapshot) -> SketchResult<Self> {
        Ok(serde_json::from_value(snapshot.0.clone())?)
    }
}

/// A shape instance on (or detached from) the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasObject {
    id: ObjectId,
    version: u32,
    /// Local geometry and style.
    pub shape: Shape,
    /// Where the shape sits on the surface.
    pub placement: Placement,
    /// Whether the select tool may pick this object.
    pub selectable: bool,
    coords: Rect,
    committed: Option<Snapshot>,
}

impl CanvasObject {
    /// Create a fresh object. The version stays 0 until the surface reports it added.
    pub fn new(shape: Shape, placement: Placement) -> Self {
        Self::with_id(Uuid::new_v4(), shape, placement)
    }

    pub(crate) fn with_id(id: ObjectId, shape: Shape, placement: Placement) -> Self {
        let mut object = Self {
            id,
            version: 0,
            shape,
            placement,
            selectable: true,
            coords: Rect::ZERO,
            committed: None,
        };
        object.set_coords();
        object
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// 0 = removed, 1 = freshly added, n > 1 = modified n - 1 times.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Cached surface-space bounds used for hit testing.
    pub fn coords(&self) -> Rect {
        self.coords
    }

    /// Recompute the cached interaction coordinates.
    pub fn set_coords(&mut self) {
        self.coords = self
            .placement
            .transform()
            .transform_rect_bbox(self.shape.bounds());
    }

    /// Current state, detached from the object.
    pub fn state(&self) -> ObjectState {
        ObjectState {
            shape: self.shape.clone(),
            placement: self.placement,
        }
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> SketchResult<Snapshot> {
        self.state().encode()
    }

    /// Last saved snapshot, if any.
    pub fn committed(&self) -> Option<&Snapshot> {
        self.committed.as_ref()
    }

    /// Save the current state as the committed snapshot and return it.
    pub fn save_state(&mut self) -> SketchResult<Snapshot> {
        let snapshot = self.snapshot()?;
        self.committed = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Replace geometry with a decoded state; it becomes the committed snapshot.
    pub fn apply_state(&mut self, state: ObjectState, snapshot: Snapshot) {
        self.shape = state.shape;
        self.placement = state.placement;
        self.committed = Some(snapshot);
        self.set_coords();
    }

    /// Hit test in surface coordinates.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if !self.coords.inflate(tolerance, tolerance).contains(point) {
            return false;
        }
        let p = &self.placement;
        if p.scale_x.abs() < f64::EPSILON || p.scale_y.abs() < f64::EPSILON {
            return true;
        }
        let local = p.transform().inverse() * point;
        let local_tolerance = tolerance / p.scale_x.abs().min(p.scale_y.abs());
        self.shape.hit_test(local, local_tolerance)
    }
}
