//! Entity extraction — topology label and device count.
//!
//! The dialogue engine's entities are the primary source. When the engine
//! recognizes the intent but leaves the count unfilled ("8 devices" parsed
//! as free text), the first standalone number in the raw text is used.

use std::sync::LazyLock;

use regex::Regex;
use tc_protocol::{DEVICE_COUNT_ENTITY, EngineEntity, ExtractedEntities, TOPOLOGY_ENTITY};

/// First standalone run of decimal digits, any script.
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)\b").unwrap());

/// A single Unicode decimal digit (general category Nd).
static RE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d$").unwrap());

/// Derive `topology` and `devices` from engine entities and raw text.
pub fn extract(text: &str, entities: &[EngineEntity]) -> ExtractedEntities {
    let mut topology = None;
    let mut devices = None;

    for entity in entities {
        match entity.entity.as_str() {
            TOPOLOGY_ENTITY => {
                if let Some(label) = entity.value_text().and_then(|v| normalize_label(&v)) {
                    topology = Some(label);
                }
            }
            DEVICE_COUNT_ENTITY => match entity.value_text().and_then(|v| parse_count(&v)) {
                Some(n) => devices = Some(n),
                None => {
                    tracing::debug!(value = %entity.value, "discarding unparsable device_count");
                }
            },
            _ => {}
        }
    }

    if devices.is_none() {
        devices = first_number(text);
    }

    ExtractedEntities { topology, devices }
}

/// Trim and lower-case a topology label; blank labels are absent.
fn normalize_label(value: &str) -> Option<String> {
    let label = value.trim().to_lowercase();
    (!label.is_empty()).then_some(label)
}

/// Parse an entity value as a device count.
///
/// Accepts plain integers and integral decimals such as "8.0", which some
/// extractors emit for JSON numbers. Signs, fractions and exponents are
/// rejected.
fn parse_count(value: &str) -> Option<u32> {
    let value = value.trim();
    let integral = match value.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        Some(_) => return None,
        None => value,
    };
    if !integral.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    integral.parse().ok()
}

/// First standalone number in the text. Overflowing runs count as absent.
fn first_number(text: &str) -> Option<u32> {
    let digits = RE_NUMBER.captures(text)?.get(1)?.as_str();
    digits
        .chars()
        .try_fold(0u32, |acc, c| acc.checked_mul(10)?.checked_add(digit_value(c)?))
}

/// Numeric value of a decimal digit in any script.
///
/// Unicode assigns Nd digits in contiguous runs of ten ordered 0..9, so the
/// value is the offset from the start of the run, modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = u32::from(c);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32)
        && is_decimal_digit(prev)
    {
        start = u32::from(prev);
    }
    Some((u32::from(c) - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    RE_DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}
