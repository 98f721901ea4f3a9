//! Parser for the roster page's localized "time since last activity" strings.
//!
//! The source page reports elapsed time as free text like
//! `"2 dias 3 horas"` or `"45 minutos 12 segundos"`. The parser scans
//! whitespace-separated tokens, carrying the most recently seen number as
//! the running magnitude and adding `magnitude * unit` whenever one of the
//! four recognized unit words appears. Anything else is ignored, so
//! malformed input degrades to a best-effort sum instead of an error.

/// Seconds in one day.
const DAY_SECS: u64 = 24 * 60 * 60;
/// Seconds in one hour.
const HOUR_SECS: u64 = 60 * 60;
/// Seconds in one minute.
const MINUTE_SECS: u64 = 60;

/// Seconds contributed by one unit of the given word, if recognized.
fn unit_seconds(word: &str) -> Option<u64> {
    match word {
        "dias" => Some(DAY_SECS),
        "horas" => Some(HOUR_SECS),
        "minutos" => Some(MINUTE_SECS),
        "segundos" => Some(1),
        _ => None,
    }
}

/// Total elapsed seconds encoded in `text`.
///
/// A token that parses as an unsigned integer becomes the running
/// magnitude; it is not reset by unrecognized words, only consumed by the
/// next recognized unit word. Input with no recognized unit words yields 0.
/// Arithmetic saturates, so absurd page content cannot overflow.
pub fn elapsed_seconds(text: &str) -> u64 {
    let mut total: u64 = 0;
    let mut magnitude: u64 = 0;

    for token in text.split_whitespace() {
        if let Ok(value) = token.parse::<u64>() {
            magnitude = value;
        } else if let Some(unit) = unit_seconds(token) {
            total = total.saturating_add(magnitude.saturating_mul(unit));
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_and_hours() {
        assert_eq!(elapsed_seconds("2 dias 3 horas"), 2 * 86400 + 3 * 3600);
    }

    #[test]
    fn full_four_units() {
        assert_eq!(
            elapsed_seconds("1 dias 2 horas 3 minutos 4 segundos"),
            86400 + 2 * 3600 + 3 * 60 + 4
        );
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(elapsed_seconds("45 minutos 12 segundos"), 45 * 60 + 12);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(elapsed_seconds(""), 0);
    }

    #[test]
    fn unrecognized_words_are_zero() {
        assert_eq!(elapsed_seconds("agora"), 0);
        assert_eq!(elapsed_seconds("5 xyz"), 0);
    }

    #[test]
    fn magnitude_survives_unrecognized_words() {
        // "5" is held across the unknown word and consumed by "minutos".
        assert_eq!(elapsed_seconds("5 xyz minutos"), 5 * 60);
    }

    #[test]
    fn magnitude_is_reused_by_consecutive_units() {
        assert_eq!(elapsed_seconds("2 dias horas"), 2 * 86400 + 2 * 3600);
    }

    #[test]
    fn negative_and_fractional_tokens_are_ignored() {
        assert_eq!(elapsed_seconds("-3 minutos"), 0);
        assert_eq!(elapsed_seconds("1.5 horas"), 0);
    }
}
