//! Passenger mood state machine
//!
//! Ned and Nosh ride in the back seat. Their mood reacts to crashes, the
//! radio and scripted wake-ups. Shifts are requested here and applied on the
//! child's next update, never immediately.

use serde::{Deserialize, Serialize};

/// Emotional state of a passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Sad,
    Critical,
    Sleep,
}

impl Mood {
    /// One step in the given direction. Sleep is left untouched.
    fn shifted(self, dir: ShiftDirection) -> Mood {
        match (self, dir) {
            (Mood::Sleep, _) => Mood::Sleep,
            (Mood::Critical, ShiftDirection::Positive) => Mood::Sad,
            (Mood::Sad, ShiftDirection::Positive) => Mood::Neutral,
            (Mood::Neutral | Mood::Happy, ShiftDirection::Positive) => Mood::Happy,
            (Mood::Happy, ShiftDirection::Negative) => Mood::Neutral,
            (Mood::Neutral, ShiftDirection::Negative) => Mood::Sad,
            // Nothing below critical
            (Mood::Sad | Mood::Critical, ShiftDirection::Negative) => Mood::Critical,
        }
    }
}

/// Direction of a pending mood shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    Positive,
    Negative,
}

/// Radio station genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Dance,
    Creepy,
    Jazz,
    Comedy,
}

/// A back-seat passenger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub name: String,
    mood: Mood,
    /// Shift to apply on the next update
    pending: Option<ShiftDirection>,
}

impl Child {
    pub fn new(name: impl Into<String>, awake: bool) -> Self {
        Self {
            name: name.into(),
            mood: if awake { Mood::Neutral } else { Mood::Sleep },
            pending: None,
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn pending_shift(&self) -> Option<ShiftDirection> {
        self.pending
    }

    pub fn is_awake(&self) -> bool {
        self.mood != Mood::Sleep
    }

    /// Set the mood directly (items). Clears any pending shift.
    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
        self.pending = None;
    }

    /// Request a shift for the next update. Sleeping children ignore it.
    pub fn request_shift(&mut self, dir: ShiftDirection) {
        if self.is_awake() {
            self.pending = Some(dir);
        }
    }

    /// React to the car hitting a gnome
    pub fn react_to_collision(&mut self) {
        match self.mood {
            Mood::Sleep => {}
            Mood::Sad | Mood::Critical => {
                self.mood = Mood::Critical;
                self.pending = Some(ShiftDirection::Negative);
            }
            Mood::Happy | Mood::Neutral => {
                self.pending = Some(ShiftDirection::Negative);
            }
        }
    }

    /// Wake a sleeping child. Returns true if the child was asleep.
    pub fn wake(&mut self) -> bool {
        if self.is_awake() {
            return false;
        }
        self.mood = Mood::Neutral;
        self.pending = Some(ShiftDirection::Positive);
        true
    }

    /// Apply the pending shift, if any
    pub fn apply_pending_shift(&mut self) {
        if let Some(dir) = self.pending.take() {
            self.mood = self.mood.shifted(dir);
        }
    }
}

/// Nudge the children according to the radio.
///
/// `frame` is the simulation frame counter. With a station playing, every
/// `RADIO_STATION_PERIOD` frames the genre pushes each awake child one way.
/// With the radio off, Ned gets bored every `RADIO_SILENCE_NED_PERIOD`
/// frames and otherwise Nosh every `RADIO_SILENCE_NOSH_PERIOD` frames.
pub fn radio_influence(frame: u64, station: Option<Genre>, ned: &mut Child, nosh: &mut Child) {
    use crate::consts::*;
    use ShiftDirection::*;

    match station {
        Some(genre) => {
            if frame % RADIO_STATION_PERIOD != 0 {
                return;
            }
            let (ned_dir, nosh_dir) = match genre {
                Genre::Dance | Genre::Creepy | Genre::Jazz => (Positive, Negative),
                Genre::Comedy => (Negative, Positive),
            };
            ned.request_shift(ned_dir);
            nosh.request_shift(nosh_dir);
        }
        None if frame == 0 => {}
        None => {
            if frame % RADIO_SILENCE_NED_PERIOD == 0 && ned.is_awake() {
                ned.request_shift(Negative);
            } else if frame % RADIO_SILENCE_NOSH_PERIOD == 0 && nosh.is_awake() {
                nosh.request_shift(Negative);
            }
        }
    }
}
