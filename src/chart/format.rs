/// Round to a whole number and group digits by thousands: `1234567.4` -> `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) if rest.bytes().any(|b| b != b'0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let mut out = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Tick positions `0, step, 2*step, ...` up to `max` with a 1/2/2.5/5 x 10^k step.
///
/// `target` is the desired number of intervals; the result has roughly that many.
pub fn nice_ticks(max: f64, target: usize) -> Vec<f64> {
    if !(max.is_finite() && max > 0.0) || target == 0 {
        return vec![0.0];
    }

    let raw = max / target as f64;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&m| m >= normalized - 1e-9)
        .unwrap_or(10.0)
        * magnitude;

    let count = (max / step + 1e-9).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/chart/format.rs"]
mod tests;
