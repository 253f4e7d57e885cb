//! Number formatting for maps and reports

/// Round to a whole number and group thousands with commas: `1440000.4` → `1,440,000`.
///
/// Exact halves round to even, so `2852.5` → `2,852`.
pub fn thousands(value: f64) -> String {
    let formatted = format!("{:.0}", value);
    let (negative, digits) = match formatted.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, formatted.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative && digits.chars().any(|c| c != '0') {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render a metre value without a trailing `.0` when it is integral
pub fn metres(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
