//! Time parsing utilities

use crate::domain::errors::DomainError;

/// Multipliers applied right to left: seconds, minutes, hours, days
const UNIT_SECONDS: [f64; 4] = [1.0, 60.0, 60.0 * 60.0, 24.0 * 60.0 * 60.0];

/// Parse `[[[days:]hours:]minutes:]seconds` into seconds
///
/// Every component may be fractional; the rightmost one is always seconds.
pub fn parse_time(time_str: &str) -> Result<f64, DomainError> {
    let trimmed = time_str.trim();
    let invalid = |reason: &str| DomainError::invalid_override("time", time_str, reason);

    if trimmed.is_empty() {
        return Err(invalid("empty time"));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > UNIT_SECONDS.len() {
        return Err(invalid("expected at most days:hours:minutes:seconds"));
    }

    let mut total = 0.0;
    for (part, unit) in parts.iter().rev().zip(UNIT_SECONDS) {
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| invalid("components must be numbers"))?;
        if !value.is_finite() {
            return Err(invalid("components must be finite"));
        }
        total += value * unit;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(parse_time("90.5").unwrap(), 90.5);
        assert_eq!(parse_time("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_time("01:30").unwrap(), 90.0);
        assert_eq!(parse_time("1:02:03.5").unwrap(), 3723.5);
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_time("1:00:00:10").unwrap(), 86_410.0);
    }

    #[test]
    fn test_components_are_not_range_checked() {
        assert_eq!(parse_time("0:90").unwrap(), 90.0);
        assert_eq!(parse_time("1.5:0").unwrap(), 90.0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_time("").is_err());
        assert!(parse_time("abc").is_err());
        assert!(parse_time("1::2").is_err());
        assert!(parse_time("1:2:3:4:5").is_err());
        assert!(parse_time("inf").is_err());
    }
}
