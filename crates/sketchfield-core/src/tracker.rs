//! Turns surface lifecycle events into history entries.

use crate::error::SketchResult;
use crate::history::{HistoryEntry, HistoryStore};
use crate::object::{CanvasObject, ObjectId};
use crate::surface::{Surface, SurfaceEvent};
use std::collections::HashMap;

/// Marks the one lifecycle event a history replay is about to cause, so the
/// tracker does not record it as a user edit. Lives for a single drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// The object is being put back on the surface; skip its "added" event.
    Reinsert(ObjectId),
    /// The object's creation is being undone; a later redo re-adds it as new.
    Uncreate(ObjectId),
}

/// A removed object kept alive for history.
#[derive(Debug, Clone)]
pub struct Detached {
    /// The record, with version 0.
    pub object: CanvasObject,
    /// Version the object regains when put back (0 = its creation was undone).
    pub restore_version: u32,
}

/// Observes surface events and records reversible entries.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    detached: HashMap<ObjectId, Detached>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process every queued surface event in order.
    ///
    /// `replay` is consumed by the first event it matches; a leftover replay
    /// is discarded when this returns.
    pub fn sync<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        history: &mut HistoryStore,
        mut replay: Option<Replay>,
    ) -> SketchResult<()> {
        for event in surface.drain_events() {
            self.handle(surface, history, event, &mut replay)?;
        }
        if let Some(unused) = replay {
            log::warn!("History replay {:?} matched no surface event", unused);
        }
        Ok(())
    }

    fn handle<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        history: &mut HistoryStore,
        event: SurfaceEvent,
        replay: &mut Option<Replay>,
    ) -> SketchResult<()> {
        match event {
            SurfaceEvent::Added(id) => {
                if *replay == Some(Replay::Reinsert(id)) {
                    *replay = None;
                    return Ok(());
                }
                let Some(object) = surface.object_mut(id) else {
                    log::debug!("Object {} left the surface before its addition was recorded", id);
                    return Ok(());
                };
                object.set_version(1);
                let state = object.save_state()?;
                log::debug!("Recorded addition of {} {}", object.shape.kind_name(), id);
                self.detached.remove(&id);
                self.keep(
                    history,
                    HistoryEntry {
                        object: id,
                        previous: state.clone(),
                        current: state,
                    },
                );
            }
            SurfaceEvent::Modified(id) => {
                let Some(object) = surface.object_mut(id) else {
                    log::debug!("Object {} left the surface before its edit was recorded", id);
                    return Ok(());
                };
                let previous = match object.committed() {
                    Some(snapshot) => snapshot.clone(),
                    None => object.snapshot()?,
                };
                let current = object.save_state()?;
                object.set_version(object.version() + 1);
                log::debug!(
                    "Recorded modification of {} {} (version {})",
                    object.shape.kind_name(),
                    id,
                    object.version()
                );
                self.keep(
                    history,
                    HistoryEntry {
                        object: id,
                        previous,
                        current,
                    },
                );
            }
            SurfaceEvent::Removed(mut object) => {
                let id = object.id();
                let restore_version = if *replay == Some(Replay::Uncreate(id)) {
                    *replay = None;
                    0
                } else {
                    object.version()
                };
                object.set_version(0);
                if history.references(id) {
                    self.detached.insert(
                        id,
                        Detached {
                            object,
                            restore_version,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn keep(&mut self, history: &mut HistoryStore, entry: HistoryEntry) {
        history.keep(entry);
        // Truncation and eviction can orphan detached objects.
        self.detached.retain(|id, _| history.references(*id));
    }

    /// A detached object, if the id refers to one.
    pub fn detached(&self, id: ObjectId) -> Option<&Detached> {
        self.detached.get(&id)
    }

    pub(crate) fn detached_mut(&mut self, id: ObjectId) -> Option<&mut Detached> {
        self.detached.get_mut(&id)
    }

    /// Take a detached object out to put it back on the surface.
    pub(crate) fn take_detached(&mut self, id: ObjectId) -> Option<Detached> {
        self.detached.remove(&id)
    }

    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    pub fn clear(&mut self) {
        self.detached.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::object::Placement;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::Point;

    fn rect() -> CanvasObject {
        CanvasObject::new(
            Shape::Rectangle(Rectangle::new(10.0, 10.0)),
            Placement::at(Point::new(1.0, 2.0)),
        )
    }

    #[test]
    fn test_added_records_identical_snapshots() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(10);
        let mut tracker = ChangeTracker::new();
        let object = rect();
        let id = object.id();

        canvas.add_object(object);
        tracker.sync(&mut canvas, &mut history, None).unwrap();

        let entry = history.current().unwrap();
        assert_eq!(entry.object, id);
        assert_eq!(entry.previous, entry.current);
        assert_eq!(canvas.object(id).unwrap().version(), 1);
    }

    #[test]
    fn test_modified_records_before_and_after() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(10);
        let mut tracker = ChangeTracker::new();
        let object = rect();
        let id = object.id();
        canvas.add_object(object);
        tracker.sync(&mut canvas, &mut history, None).unwrap();
        let before = canvas.object(id).unwrap().snapshot().unwrap();

        canvas.object_mut(id).unwrap().placement.left = 40.0;
        canvas.notify_modified(id);
        tracker.sync(&mut canvas, &mut history, None).unwrap();

        let object = canvas.object(id).unwrap();
        assert_eq!(object.version(), 2);
        let entry = history.current().unwrap();
        assert_eq!(entry.previous, before);
        assert_eq!(entry.current, object.snapshot().unwrap());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_removed_detaches_without_entry() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(10);
        let mut tracker = ChangeTracker::new();
        let object = rect();
        let id = object.id();
        canvas.add_object(object);
        tracker.sync(&mut canvas, &mut history, None).unwrap();

        canvas.remove_object(id);
        tracker.sync(&mut canvas, &mut history, None).unwrap();

        assert_eq!(history.len(), 1);
        let detached = tracker.detached(id).unwrap();
        assert_eq!(detached.object.version(), 0);
        assert_eq!(detached.restore_version, 1);
    }

    #[test]
    fn test_reinsert_replay_suppresses_one_addition() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(10);
        let mut tracker = ChangeTracker::new();
        let object = rect();
        let id = object.id();

        canvas.add_object(object);
        tracker
            .sync(&mut canvas, &mut history, Some(Replay::Reinsert(id)))
            .unwrap();
        assert!(history.is_empty());

        // The replay does not outlive the drain.
        canvas.remove_object(id);
        canvas.drain_events();
        canvas.add_object(rect());
        tracker.sync(&mut canvas, &mut history, None).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_uncreate_replay_resets_restore_version() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(10);
        let mut tracker = ChangeTracker::new();
        let object = rect();
        let id = object.id();
        canvas.add_object(object);
        tracker.sync(&mut canvas, &mut history, None).unwrap();

        canvas.remove_object(id);
        tracker
            .sync(&mut canvas, &mut history, Some(Replay::Uncreate(id)))
            .unwrap();
        assert_eq!(tracker.detached(id).unwrap().restore_version, 0);
    }

    #[test]
    fn test_orphaned_detached_objects_are_dropped() {
        let mut canvas = Canvas::new();
        let mut history = HistoryStore::new(1);
        let mut tracker = ChangeTracker::new();
        let first = rect();
        let first_id = first.id();
        canvas.add_object(first);
        tracker.sync(&mut canvas, &mut history, None).unwrap();
        canvas.remove_object(first_id);
        tracker.sync(&mut canvas, &mut history, None).unwrap();
        assert_eq!(tracker.detached_count(), 1);

        // Capacity 1: the next addition evicts the only entry naming `first`.
        canvas.add_object(rect());
        tracker.sync(&mut canvas, &mut history, None).unwrap();
        assert_eq!(tracker.detached_count(), 0);
    }
}
