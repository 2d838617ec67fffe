//! Scripted level events keyed to scroll position
//!
//! Each level carries an ordered list of events. As the road scrolls the
//! timeline accumulates the distance travelled and fires the next event once
//! the scroll position is within `EVENT_TOLERANCE` of its trigger. There is
//! no crossing test: a step larger than twice the tolerance can jump over an
//! event, and the cursor then waits on it forever.

use serde::{Deserialize, Serialize};

use super::mood::Child;
use super::rearview::RearviewEnemy;
use super::state::GameEvent;
use crate::consts::EVENT_TOLERANCE;

/// Kinds of scripted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    RearEnemy,
    SunStart,
    SunEnd,
    NedWakesUp,
    NoshWakesUp,
    SatQuestion,
}

/// An event placed along the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelEvent {
    /// Scroll position at which the event fires
    #[serde(rename = "y")]
    pub trigger_y: f32,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl LevelEvent {
    pub fn new(trigger_y: f32, kind: EventKind) -> Self {
        Self { trigger_y, kind }
    }
}

/// Everything an event may act on
pub struct EventTargets<'a> {
    pub ned: &'a mut Child,
    pub nosh: &'a mut Child,
    pub rearview: &'a mut RearviewEnemy,
    pub sun_shine: &'a mut bool,
    pub events: &'a mut Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTimeline {
    events: Vec<LevelEvent>,
    /// Index of the next event to fire. Only moves forward.
    next: usize,
    /// Accumulated scroll position
    ypos: f32,
}

impl EventTimeline {
    /// Events are ordered by trigger position; ties keep their given order.
    pub fn new(mut events: Vec<LevelEvent>) -> Self {
        events.sort_by(|a, b| a.trigger_y.total_cmp(&b.trigger_y));
        Self {
            events,
            next: 0,
            ypos: 0.0,
        }
    }

    pub fn ypos(&self) -> f32 {
        self.ypos
    }

    pub fn cursor(&self) -> usize {
        self.next
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.events.len()
    }

    /// The event the cursor is waiting on
    pub fn peek(&self) -> Option<&LevelEvent> {
        self.events.get(self.next)
    }

    /// Rewind to the start of the level
    pub fn reset(&mut self) {
        self.next = 0;
        self.ypos = 0.0;
    }

    /// Advance the scroll position and fire at most one event.
    ///
    /// Returns the kind of the event fired this call, if any. Once every
    /// event has fired this does nothing.
    pub fn advance(
        &mut self,
        dt: f32,
        scroll_speed: f32,
        targets: &mut EventTargets<'_>,
    ) -> Option<EventKind> {
        let event = *self.events.get(self.next)?;

        self.ypos += scroll_speed * dt;
        if (event.trigger_y - self.ypos).abs() >= EVENT_TOLERANCE {
            return None;
        }

        log::info!("Event {:?} at y={:.2}", event.kind, self.ypos);
        dispatch(event.kind, targets);
        self.next += 1;
        Some(event.kind)
    }
}

fn dispatch(kind: EventKind, t: &mut EventTargets<'_>) {
    match kind {
        EventKind::RearEnemy => {
            if t.rearview.create() {
                t.events.push(GameEvent::RearEnemySpawned);
            }
        }
        EventKind::SunStart => {
            *t.sun_shine = true;
            t.events.push(GameEvent::SunStarted);
        }
        EventKind::SunEnd => {
            *t.sun_shine = false;
            t.events.push(GameEvent::SunEnded);
        }
        EventKind::NedWakesUp => {
            if t.ned.wake() {
                t.events.push(GameEvent::ChildWoke {
                    name: t.ned.name.clone(),
                });
            }
        }
        EventKind::NoshWakesUp => {
            if t.nosh.wake() {
                t.events.push(GameEvent::ChildWoke {
                    name: t.nosh.name.clone(),
                });
            }
        }
        // Reserved for the quiz sequence; consumed without effect
        EventKind::SatQuestion => {}
    }
}
