//! Entity collection
//!
//! Destroyed entities are reclaimed with a single-generation copying pass:
//! survivors are copied into a backing vector, the vectors are swapped and
//! the stale one is cleared. Copying live entities is O(n); removing dead
//! ones in place would shift the tail on every removal.

use super::entity::{ObjectType, RoadObject};
use super::state::GameEvent;

/// Stop-and-copy collector for a live entity set
#[derive(Debug, Clone)]
pub struct Collector<T> {
    /// Always empty between passes. Never aliases the live set.
    backing: Vec<T>,
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            backing: Vec::new(),
        }
    }
}

impl<T: RoadObject> Collector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the backing store for `capacity` live entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            backing: Vec::with_capacity(capacity),
        }
    }

    /// Remove destroyed entities from `live`, running each one's destruction
    /// hook. Survivors keep their relative order. Returns the number reclaimed.
    pub fn collect(&mut self, live: &mut Vec<T>, events: &mut Vec<GameEvent>) -> usize {
        debug_assert!(self.backing.is_empty());

        let mut reclaimed = 0;
        for obj in live.drain(..) {
            if obj.is_destroyed() {
                destroy_hook(&obj, events);
                reclaimed += 1;
            } else {
                self.backing.push(obj);
            }
        }

        std::mem::swap(live, &mut self.backing);
        self.backing.clear();
        reclaimed
    }

    pub fn backing_len(&self) -> usize {
        self.backing.len()
    }

    #[cfg(test)]
    pub(crate) fn backing_capacity(&self) -> usize {
        self.backing.capacity()
    }

    /// Drop anything held by the backing store (level reset)
    pub fn reset(&mut self) {
        self.backing.clear();
    }
}

/// Type-specific teardown for a reclaimed entity
fn destroy_hook<T: RoadObject>(obj: &T, events: &mut Vec<GameEvent>) {
    match obj.object_type() {
        ObjectType::Gnome => events.push(GameEvent::GnomeCollected {
            id: obj.id(),
            pos: obj.pos(),
        }),
        ObjectType::Car => log::debug!("Car {} reclaimed", obj.id()),
        ObjectType::Image => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Gnome, GnomeKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn gnomes(flags: &[bool]) -> Vec<Gnome> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &dead)| {
                let mut g = Gnome::new(i as u32, Vec2::new(0.0, i as f32), GnomeKind::Basic);
                g.destroyed = dead;
                g
            })
            .collect()
    }

    #[test]
    fn test_collect_removes_destroyed() {
        let mut collector = Collector::new();
        let mut live = gnomes(&[false, true, false, true]);
        let mut events = Vec::new();

        let reclaimed = collector.collect(&mut live, &mut events);

        assert_eq!(reclaimed, 2);
        assert_eq!(live.iter().map(|g| g.id).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(collector.backing_len(), 0);
        assert_eq!(
            events,
            vec![
                GameEvent::GnomeCollected {
                    id: 1,
                    pos: Vec2::new(0.0, 1.0)
                },
                GameEvent::GnomeCollected {
                    id: 3,
                    pos: Vec2::new(0.0, 3.0)
                },
            ]
        );
    }

    #[test]
    fn test_collect_empty_is_noop() {
        let mut collector: Collector<Gnome> = Collector::new();
        let mut live = Vec::new();
        let mut events = Vec::new();
        assert_eq!(collector.collect(&mut live, &mut events), 0);
        assert!(live.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_buffers_are_reused() {
        let mut collector = Collector::with_capacity(8);
        let mut live = gnomes(&[false; 8]);
        live.reserve(8);
        let mut events = Vec::new();

        collector.collect(&mut live, &mut events);
        collector.collect(&mut live, &mut events);
        let caps = (live.capacity(), collector.backing_capacity());

        for _ in 0..10 {
            collector.collect(&mut live, &mut events);
        }
        let after = (live.capacity(), collector.backing_capacity());
        assert!(after == caps || after == (caps.1, caps.0));
    }

    #[test]
    fn test_collect_wrecked_car() {
        use crate::sim::state::Car;

        let mut collector = Collector::new();
        let mut live = vec![Car::new(true, true), Car::new(true, true).with_health(0)];
        let mut events = Vec::new();

        assert_eq!(collector.collect(&mut live, &mut events), 1);
        assert_eq!(live.len(), 1);
        assert!(!live[0].destroyed);
        // Only gnomes announce their collection
        assert!(events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_collect_keeps_exactly_the_survivors(flags in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut collector = Collector::new();
            let mut live = gnomes(&flags);
            let mut events = Vec::new();

            let expected: Vec<u32> = flags
                .iter()
                .enumerate()
                .filter(|(_, dead)| !**dead)
                .map(|(i, _)| i as u32)
                .collect();

            let reclaimed = collector.collect(&mut live, &mut events);

            prop_assert_eq!(live.iter().map(|g| g.id).collect::<Vec<_>>(), expected);
            prop_assert_eq!(reclaimed, flags.iter().filter(|d| **d).count());
            prop_assert_eq!(collector.backing_len(), 0);
            prop_assert!(live.iter().all(|g| !g.destroyed));
        }

        #[test]
        fn prop_collect_without_deaths_is_identity(n in 0usize..64) {
            let mut collector = Collector::new();
            let mut live = gnomes(&vec![false; n]);
            let before: Vec<u32> = live.iter().map(|g| g.id).collect();
            let mut events = Vec::new();

            prop_assert_eq!(collector.collect(&mut live, &mut events), 0);
            prop_assert_eq!(live.iter().map(|g| g.id).collect::<Vec<_>>(), before);
            prop_assert!(events.is_empty());
        }
    }
}
