use aerodesk_core::repository::{ConflictKind, StoreError};
use sqlx::error::ErrorKind;

/// Maps a Postgres unique-constraint name to its domain conflict. These names
/// must stay in sync with `migrations/`.
pub(crate) fn conflict_for_constraint(constraint: &str) -> Option<ConflictKind> {
    match constraint {
        "boarding_flight_seat_key" => Some(ConflictKind::SeatTaken),
        "boarding_passenger_flight_key" => Some(ConflictKind::DuplicateCheckIn),
        "passenger_pkey" => Some(ConflictKind::DuplicatePassengerId),
        "passenger_phone_key" => Some(ConflictKind::DuplicatePhoneNumber),
        "flight_pkey" => Some(ConflictKind::DuplicateFlightNumber),
        "flight_gate_departure_key" => Some(ConflictKind::GateOccupied),
        "employee_pkey" => Some(ConflictKind::DuplicateEmployeeId),
        "employee_email_key" => Some(ConflictKind::DuplicateEmail),
        _ => None,
    }
}

/// Flattens sqlx errors into the gateway taxonomy. Unique violations become
/// typed conflicts; connectivity problems become the retryable variant;
/// everything else is an opaque database error.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            if db.kind() == ErrorKind::UniqueViolation {
                if let Some(kind) = db.constraint().and_then(conflict_for_constraint) {
                    return StoreError::Conflict(kind);
                }
            }
            StoreError::Database(db.to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names_map_to_conflicts() {
        assert_eq!(
            conflict_for_constraint("boarding_flight_seat_key"),
            Some(ConflictKind::SeatTaken)
        );
        assert_eq!(
            conflict_for_constraint("boarding_passenger_flight_key"),
            Some(ConflictKind::DuplicateCheckIn)
        );
        assert_eq!(
            conflict_for_constraint("employee_email_key"),
            Some(ConflictKind::DuplicateEmail)
        );
        assert_eq!(conflict_for_constraint("something_else"), None);
    }
}
