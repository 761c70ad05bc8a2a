/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
}

/// Wrap `text` in `color` when coloring is on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_only_with_color() {
        assert_eq!(paint("due", Color::RED, false), "due");
        assert_eq!(paint("due", Color::RED, true), "\x1b[31mdue\x1b[0m");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ねこ", 5), "ねこ");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
