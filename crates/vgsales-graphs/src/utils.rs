//! Drawing helpers.

use plotters::style::RGBColor;
use vgsales_common::{Result, SalesError};

/// Fallback value-axis bound for charts with no positive value.
const EMPTY_AXIS_MAX: f64 = 1.0;

/// Parses a `#rrggbb` color.
///
/// # Errors
///
/// Fails on anything but a `#` followed by six hex digits.
pub fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let invalid = || SalesError::validation_field(format!("Invalid color '{value}'"), "color");

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Upper bound of a value axis: the largest value plus 10% headroom.
#[must_use]
pub fn value_axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        EMPTY_AXIS_MAX
    }
}

/// Palette index for every entry of `keys`: equal keys share a color, new
/// keys take the next palette slot in first-appearance order.
#[must_use]
pub fn color_slots<'a>(keys: impl IntoIterator<Item = &'a str>, palette_len: usize) -> Vec<usize> {
    let mut seen: Vec<&str> = Vec::new();
    keys.into_iter()
        .map(|key| {
            let slot = seen.iter().position(|k| *k == key).unwrap_or_else(|| {
                seen.push(key);
                seen.len() - 1
            });
            slot % palette_len.max(1)
        })
        .collect()
}
