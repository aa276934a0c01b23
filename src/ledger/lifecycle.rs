use crate::error::AppError;
use crate::models::booking::BookingStatus;

/// Parse a client-supplied status value. Only the three transition targets
/// are accepted; everything else (including "Pending") is a validation
/// error, raised before any lookup or write.
pub fn parse_requested_status(raw: &str) -> Result<BookingStatus, AppError> {
    match raw {
        "Accepted" => Ok(BookingStatus::Accepted),
        "Rejected" => Ok(BookingStatus::Rejected),
        "Completed" => Ok(BookingStatus::Completed),
        other => Err(AppError::BadRequest(format!(
            "invalid status: {other}, expected Accepted/Rejected/Completed"
        ))),
    }
}

/// Advance a booking's status. Only Pending bookings can move; Accepted,
/// Rejected and Completed are terminal.
pub fn apply_transition(
    current: BookingStatus,
    requested: BookingStatus,
) -> Result<BookingStatus, AppError> {
    if current.is_terminal() {
        return Err(AppError::Conflict(format!(
            "booking already {current:?}"
        )));
    }

    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::{apply_transition, parse_requested_status};
    use crate::models::booking::BookingStatus;

    #[test]
    fn accepts_the_three_transition_targets() {
        assert_eq!(
            parse_requested_status("Accepted").unwrap(),
            BookingStatus::Accepted
        );
        assert_eq!(
            parse_requested_status("Rejected").unwrap(),
            BookingStatus::Rejected
        );
        assert_eq!(
            parse_requested_status("Completed").unwrap(),
            BookingStatus::Completed
        );
    }

    #[test]
    fn rejects_unknown_and_initial_status_values() {
        assert!(parse_requested_status("Shipped").is_err());
        assert!(parse_requested_status("Pending").is_err());
        assert!(parse_requested_status("accepted").is_err());
        assert!(parse_requested_status("").is_err());
    }

    #[test]
    fn pending_can_move_to_any_target() {
        for target in [
            BookingStatus::Accepted,
            BookingStatus::Rejected,
            BookingStatus::Completed,
        ] {
            assert_eq!(
                apply_transition(BookingStatus::Pending, target).unwrap(),
                target
            );
        }
    }

    #[test]
    fn terminal_states_cannot_move() {
        for current in [
            BookingStatus::Accepted,
            BookingStatus::Rejected,
            BookingStatus::Completed,
        ] {
            assert!(apply_transition(current, BookingStatus::Completed).is_err());
        }
    }
}
