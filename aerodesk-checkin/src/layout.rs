use serde::{Deserialize, Serialize};

/// Cabin partition of the aircraft. Each section contributes its own block of
/// seat labels to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinSection {
    Business,
    Economy,
}

/// Row range and seat letters for one cabin section, supplied at startup from
/// configuration. Row 3 with letters "ABCD" yields 3A, 3B, 3C, 3D.
#[derive(Debug, Clone, Deserialize)]
pub struct CabinSpec {
    pub first_row: u32,
    pub last_row: u32,
    pub letters: String,
}

#[derive(Debug, Clone)]
struct Seat {
    label: String,
    section: CabinSection,
}

/// The fixed set of seat labels for an aircraft, in cabin order. Seats are
/// static configuration; occupancy lives in `SeatMap`.
#[derive(Debug, Clone)]
pub struct SeatLayout {
    seats: Vec<Seat>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cabin section {0:?} has no seats")]
    EmptySection(CabinSection),

    #[error("row range {first}-{last} is reversed")]
    ReversedRows { first: u32, last: u32 },

    #[error("duplicate seat label {0}")]
    DuplicateLabel(String),
}

impl SeatLayout {
    /// Builds the layout from the business and economy specs. Label
    /// uniqueness across sections is validated here so the seat map can trust
    /// its keys.
    pub fn from_cabins(business: &CabinSpec, economy: &CabinSpec) -> Result<Self, LayoutError> {
        let mut seats = Vec::new();
        expand_section(CabinSection::Business, business, &mut seats)?;
        expand_section(CabinSection::Economy, economy, &mut seats)?;

        let mut seen = std::collections::HashSet::new();
        for seat in &seats {
            if !seen.insert(seat.label.as_str()) {
                return Err(LayoutError::DuplicateLabel(seat.label.clone()));
            }
        }

        Ok(Self { seats })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().map(|s| s.label.as_str())
    }

    pub fn section_of(&self, label: &str) -> Option<CabinSection> {
        self.seats
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.section)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.seats.iter().any(|s| s.label == label)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

fn expand_section(
    section: CabinSection,
    spec: &CabinSpec,
    out: &mut Vec<Seat>,
) -> Result<(), LayoutError> {
    if spec.first_row > spec.last_row {
        return Err(LayoutError::ReversedRows {
            first: spec.first_row,
            last: spec.last_row,
        });
    }
    if spec.letters.is_empty() {
        return Err(LayoutError::EmptySection(section));
    }
    for row in spec.first_row..=spec.last_row {
        for letter in spec.letters.chars() {
            out.push(Seat {
                label: format!("{}{}", row, letter),
                section,
            });
        }
    }
    Ok(())
}
