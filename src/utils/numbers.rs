use crate::utils::constants::NO_DATA_MARKER;

/// Parse a number written with a decimal comma and a thousands dot.
///
/// Empty cells, the `*` no-data marker and anything unparseable come back as `None`.
///
/// # Examples
/// ```
/// use meteo_bolivia::utils::parse_localized_number;
///
/// assert_eq!(parse_localized_number("1.013,2"), Some(1013.2));
/// assert_eq!(parse_localized_number("-3,5"), Some(-3.5));
/// assert_eq!(parse_localized_number("*"), None);
/// ```
pub fn parse_localized_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATA_MARKER {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a free-text cell, mapping blanks and the no-data marker to `None`
pub fn parse_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATA_MARKER {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Round half away from zero to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_localized_number("12"), Some(12.0));
        assert_eq!(parse_localized_number(" 0,0 "), Some(0.0));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_localized_number("1.020,75"), Some(1020.75));
    }

    #[test]
    fn test_garbage_is_missing() {
        assert_eq!(parse_localized_number(""), None);
        assert_eq!(parse_localized_number("n/d"), None);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label(" NNE "), Some("NNE".to_string()));
        assert_eq!(parse_label("*"), None);
        assert_eq!(parse_label("  "), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(-0.06, 1), -0.1);
        assert_eq!(round_to(7.0, 1), 7.0);
    }
}
