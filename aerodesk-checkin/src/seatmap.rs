use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::layout::{CabinSection, SeatLayout};

/// Occupancy state of a single seat.
///
/// Transitions: Free -> Selected (agent pick), Selected -> Free (different
/// pick, or reset), Free -> Occupied (reload after a committed check-in).
/// Occupied is terminal until the boarding record is deleted and the map
/// reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    Free,
    Selected,
    Occupied,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeatMapError {
    #[error("unknown seat label {0}")]
    UnknownSeat(String),

    #[error("seat {0} is not available")]
    SeatUnavailable(String),
}

/// Keyed occupancy map for one flight: seat label -> state. Presentation
/// layers render this; they never own seat state themselves.
#[derive(Debug, Clone)]
pub struct SeatMap {
    layout: SeatLayout,
    states: BTreeMap<String, SeatState>,
    selected: Option<String>,
}

impl SeatMap {
    /// A fresh map with every seat in the layout free.
    pub fn new(layout: SeatLayout) -> Self {
        let states = layout
            .labels()
            .map(|label| (label.to_string(), SeatState::Free))
            .collect();
        Self {
            layout,
            states,
            selected: None,
        }
    }

    /// Marks every seat free and selectable and clears the selection.
    pub fn reset(&mut self) {
        for state in self.states.values_mut() {
            *state = SeatState::Free;
        }
        self.selected = None;
    }

    /// Overwrites the map from a set of occupied labels: listed seats become
    /// Occupied (non-selectable), everything else Free. Any prior selection
    /// is dropped, since this models a reload from the store.
    pub fn apply_occupancy(&mut self, occupied: &HashSet<String>) {
        for (label, state) in self.states.iter_mut() {
            *state = if occupied.contains(label) {
                SeatState::Occupied
            } else {
                SeatState::Free
            };
        }
        self.selected = None;
    }

    /// Selects a seat for the pending check-in. Only a Free seat can be
    /// selected; at most one seat is Selected at a time, and picking a new
    /// one demotes the previous pick back to Free.
    pub fn select(&mut self, label: &str) -> Result<(), SeatMapError> {
        match self.states.get(label) {
            None => return Err(SeatMapError::UnknownSeat(label.to_string())),
            Some(SeatState::Occupied) => {
                return Err(SeatMapError::SeatUnavailable(label.to_string()))
            }
            Some(SeatState::Selected) => return Ok(()),
            Some(SeatState::Free) => {}
        }

        if let Some(previous) = self.selected.take() {
            // The previous pick was by definition not occupied.
            if let Some(state) = self.states.get_mut(&previous) {
                *state = SeatState::Free;
            }
        }

        self.states
            .insert(label.to_string(), SeatState::Selected);
        self.selected = Some(label.to_string());
        Ok(())
    }

    /// Drops the pending selection, if any, returning that seat to Free.
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(state) = self.states.get_mut(&previous) {
                *state = SeatState::Free;
            }
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self, label: &str) -> Option<SeatState> {
        self.states.get(label).copied()
    }

    /// Seats currently marked Occupied.
    pub fn occupied(&self) -> HashSet<String> {
        self.states
            .iter()
            .filter(|(_, state)| **state == SeatState::Occupied)
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// All seats in layout order with section and state, for rendering.
    pub fn seats(&self) -> impl Iterator<Item = (&str, CabinSection, SeatState)> {
        self.layout.labels().map(move |label| {
            let section = self
                .layout
                .section_of(label)
                .unwrap_or(CabinSection::Economy);
            let state = self
                .states
                .get(label)
                .copied()
                .unwrap_or(SeatState::Free);
            (label, section, state)
        })
    }

    pub fn layout(&self) -> &SeatLayout {
        &self.layout
    }
}
