/// Format a Philippine or North American phone number for display.
/// Anything unrecognised is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        // 09171234567 -> 0917 123 4567
        11 if digits.starts_with("09") => format!(
            "{} {} {}",
            &digits[0..4],
            &digits[4..7],
            &digits[7..11]
        ),
        // 639171234567 -> +63 917 123 4567
        12 if digits.starts_with("63") => format!(
            "+63 {} {} {}",
            &digits[2..5],
            &digits[5..8],
            &digits[8..12]
        ),
        10 => format!(
            "({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        ),
        _ => phone.to_string(),
    }
}

/// Format service hours without a trailing ".0" for whole hours.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        let s = format!("{:.2}", hours);
        s.trim_end_matches('0').to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Render a text progress bar of `width` cells, e.g. "[#####-----]".
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
