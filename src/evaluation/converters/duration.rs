use regex::Regex;
use std::sync::OnceLock;

static DURATION_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn duration_pattern() -> Option<&'static Regex> {
    DURATION_PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(\d+(?:\.\d+)?)\s*(minutos?|minutes?|mins?|horas?|hours?|días?|dias?|days?)",
            )
            .ok()
        })
        .as_ref()
}

/// Converts free-text durations such as `"45 min"`, `"2.5 horas"` or `"1 día"` to minutes.
///
/// Text with no recognizable `<number> <unit>` pair yields `0.0` rather than an error.
pub fn parse_minutes(text: &str) -> f64 {
    let normalized = text.trim().to_lowercase();
    let Some(captures) = duration_pattern().and_then(|pattern| pattern.captures(&normalized))
    else {
        return 0.0;
    };

    let value = captures
        .get(1)
        .and_then(|amount| amount.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    let unit = captures.get(2).map(|unit| unit.as_str()).unwrap_or_default();

    value * unit_minutes(unit)
}

fn unit_minutes(unit: &str) -> f64 {
    if unit.starts_with("min") {
        1.0
    } else if unit.starts_with("hora") || unit.starts_with("hour") {
        60.0
    } else if unit.starts_with("día") || unit.starts_with("dia") || unit.starts_with("day") {
        24.0 * 60.0
    } else {
        0.0
    }
}
