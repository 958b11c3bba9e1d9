/// Render a minute count as `"{h}h {m}min"`, or `"{m}min"` under an hour.
pub fn to_hours_and_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}min", hours, minutes)
    } else {
        format!("{}min", minutes)
    }
}

/// Caption for a committed runtime range, or `None` when neither bound is set.
pub fn runtime_caption(min: Option<u32>, max: Option<u32>) -> Option<String> {
    match (min, max) {
        (None, None) => None,
        (Some(min), None) => Some(format!("From {}", to_hours_and_minutes(min))),
        (None, Some(max)) => Some(format!("To {}", to_hours_and_minutes(max))),
        (Some(min), Some(max)) => Some(format!(
            "From {} to {}",
            to_hours_and_minutes(min),
            to_hours_and_minutes(max)
        )),
    }
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}
