//! Human-readable labels for profile settings and dashboard numbers.

/// Maps an activity factor to its category name. Upper bounds are inclusive.
pub fn activity_level_to_string(level: f64) -> &'static str {
    if level <= 1.2 {
        "Sedentary"
    } else if level <= 1.375 {
        "Lightly Active"
    } else if level <= 1.55 {
        "Moderately Active"
    } else if level <= 1.725 {
        "Very Active"
    } else {
        "Extremely Active"
    }
}

/// Describes a goal offset as a weekly weight change, assuming 1000 kcal/day
/// per kg/week: `-750` becomes `Lose 0.8 kg/week`.
///
/// The kg figure is the `f64` quotient rounded to one decimal the way
/// JavaScript's `toFixed(1)` does, so `150` reads `0.1` (0.15 is stored just
/// below the midpoint) while the exact midpoint `250` reads `0.3`.
pub fn goal_to_label(goal_offset_kcal: i32) -> String {
    let weekly_change = one_decimal_like_to_fixed(f64::from(goal_offset_kcal.unsigned_abs()) / 1000.0);

    match goal_offset_kcal {
        o if o < 0 => format!("Lose {} kg/week", weekly_change),
        o if o > 0 => format!("Gain {} kg/week", weekly_change),
        _ => "Maintain weight".to_string(),
    }
}

// `{:.1}` rounds the exact binary value but breaks exact ties to even, while
// `toFixed` takes the larger candidate. For one decimal the only exact ties are
// odd multiples of 0.25.
fn one_decimal_like_to_fixed(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (quarters as u64 * 10 + 3) / 4;
        return format!("{}.{}", tenths / 10, tenths % 10);
    }
    format!("{:.1}", value)
}

/// Clamps a value into `[min, max]`, the way the settings sliders bound input.
pub fn clamp_to_range(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Formats a number with comma thousands separators on its integer part.
///
/// Missing values and NaN render as `"0"`.
pub fn format_number(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return "0".to_string(),
    };

    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
