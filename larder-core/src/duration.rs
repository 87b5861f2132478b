//! Cooking-time parsing and display.
//!
//! schema.org publishes times as ISO-8601 durations (`PT1H30M`), but plenty
//! of sites write plain text (`"25 mins"`) or a bare number of minutes.

use std::sync::LazyLock;

use regex::Regex;

static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("Invalid ISO duration regex")
});

/// Free-text amounts like "1 hour 20 mins" or "1.5 hrs".
static TEXT_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(days?|hours?|hrs?|h|minutes?|mins?|m)\b")
        .expect("Invalid text duration regex")
});

/// Parse a duration into whole minutes, rounding seconds to the nearest minute.
///
/// Accepts ISO-8601 (`PT1H30M`, `P0DT0H20M`), bare numbers (taken as minutes)
/// and simple English phrases. Returns `None` for anything else.
pub fn parse_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DURATION_REGEX.captures(raw) {
        let part = |i: usize| -> f64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        // A bare "P" or "PT" matches the pattern but carries no amount.
        if (1..=4).all(|i| caps.get(i).is_none()) {
            return None;
        }
        let minutes = part(1) * 1440.0 + part(2) * 60.0 + part(3) + part(4) / 60.0;
        return to_whole_minutes(minutes);
    }

    if let Ok(n) = raw.parse::<f64>() {
        return to_whole_minutes(n);
    }

    let mut minutes = 0.0;
    let mut matched = false;
    for caps in TEXT_DURATION_REGEX.captures_iter(raw) {
        let amount: f64 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let unit = caps[2].to_ascii_lowercase();
        minutes += if unit.starts_with('d') {
            amount * 1440.0
        } else if unit.starts_with('h') {
            amount * 60.0
        } else {
            amount
        };
        matched = true;
    }

    if matched {
        to_whole_minutes(minutes)
    } else {
        None
    }
}

fn to_whole_minutes(minutes: f64) -> Option<u32> {
    if !minutes.is_finite() || minutes < 0.0 || minutes > f64::from(u32::MAX) {
        return None;
    }
    Some(minutes.round() as u32)
}

/// Render minutes the way a person would write them: "1 hour 30 minutes".
pub fn format_minutes(total: u32) -> String {
    let hours = total / 60;
    let minutes = total % 60;

    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (hours, minutes) {
        (0, m) => plural(m, "minute"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "minute")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_durations() {
        assert_eq!(parse_minutes("PT20M"), Some(20));
        assert_eq!(parse_minutes("PT1H30M"), Some(90));
        assert_eq!(parse_minutes("P0DT0H45M"), Some(45));
        assert_eq!(parse_minutes("P1D"), Some(1440));
        assert_eq!(parse_minutes("PT0.5H"), Some(30));
        assert_eq!(parse_minutes("pt10m"), Some(10));
    }

    #[test]
    fn iso_seconds_round_to_nearest_minute() {
        assert_eq!(parse_minutes("PT1M40S"), Some(2));
        assert_eq!(parse_minutes("PT20S"), Some(0));
    }

    #[test]
    fn bare_numbers_are_minutes() {
        assert_eq!(parse_minutes("15"), Some(15));
        assert_eq!(parse_minutes(" 7.6 "), Some(8));
    }

    #[test]
    fn text_durations() {
        assert_eq!(parse_minutes("1 hour 20 mins"), Some(80));
        assert_eq!(parse_minutes("25 minutes"), Some(25));
        assert_eq!(parse_minutes("1.5 hrs"), Some(90));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("PT"), None);
        assert_eq!(parse_minutes("a while"), None);
        assert_eq!(parse_minutes("-5"), None);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_minutes(1), "1 minute");
        assert_eq!(format_minutes(15), "15 minutes");
        assert_eq!(format_minutes(60), "1 hour");
        assert_eq!(format_minutes(90), "1 hour 30 minutes");
        assert_eq!(format_minutes(125), "2 hours 5 minutes");
        assert_eq!(format_minutes(61), "1 hour 1 minute");
    }
}
