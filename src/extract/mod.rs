//! Field extraction from recognized nameplate text.
//!
//! Derives three structured fields from the raw OCR output:
//! - a numeric reading with optional unit (%, g, mg, kg)
//! - the device name line (METTLER / ANALYZER / SELEC markers)
//! - a serial number token (2-3 uppercase letters + 2-4 digits)
//!
//! Each derivation is an independent, stateless scan over the full text.
//! The first match in document order wins; a field with no match is the
//! empty string. Identical input always yields identical output.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// A decimal number at a word boundary, either followed by a unit or
/// ending at a word boundary itself. Numbers fused to non-unit letters
/// ("100ml", "24mm") match neither branch and are skipped entirely.
/// Alphabetic units must be complete tokens; `%` is self-delimiting, so
/// "12.5 %" captures the unit while "5 grams" does not.
static READING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)(?:\s*(%|(?:mg|kg|g)\b)|\b)").unwrap()
});

/// Serial tokens like "HE7300" or "AB 12" (case-sensitive on purpose).
static SERIAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,3}\s?\d{2,4})\b").unwrap());

/// Marker substrings identifying a device-name line (matched upper-cased).
const DEVICE_MARKERS: [&str; 3] = ["METTLER", "ANALYZER", "SELEC"];

/// Structured fields derived from one OCR pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExtractedFields {
    pub device_name: String,
    pub serial_number: String,
    pub reading: String,
}

/// Run all three field derivations over the recognized text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    ExtractedFields {
        device_name: extract_device_name(text),
        serial_number: extract_serial_number(text),
        reading: extract_reading(text),
    }
}

/// First decimal number in the text, formatted as "<number> <unit>" when a
/// unit token immediately follows, or just the number otherwise.
pub fn extract_reading(text: &str) -> String {
    let Some(caps) = READING_PATTERN.captures(text) else {
        return String::new();
    };
    let number = &caps[1];
    match caps.get(2) {
        Some(unit) => format!("{} {}", number, unit.as_str()),
        None => number.to_string(),
    }
}

/// First line containing one of the known device markers, original casing,
/// trimmed.
pub fn extract_device_name(text: &str) -> String {
    text.lines()
        .find(|line| {
            let upper = line.to_uppercase();
            DEVICE_MARKERS.iter().any(|m| upper.contains(m))
        })
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}

/// First serial-number token in the text.
pub fn extract_serial_number(text: &str) -> String {
    SERIAL_PATTERN
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
