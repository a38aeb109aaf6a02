//! Large block digits for the timer face.

/// Rows per glyph.
pub const HEIGHT: usize = 5;

fn glyph(c: char) -> Option<[&'static str; HEIGHT]> {
    let rows = match c {
        '0' => ["█████", "█   █", "█   █", "█   █", "█████"],
        '1' => ["   █ ", "  ██ ", "   █ ", "   █ ", "  ███"],
        '2' => ["█████", "    █", "█████", "█    ", "█████"],
        '3' => ["█████", "    █", " ████", "    █", "█████"],
        '4' => ["█   █", "█   █", "█████", "    █", "    █"],
        '5' => ["█████", "█    ", "█████", "    █", "█████"],
        '6' => ["█████", "█    ", "█████", "█   █", "█████"],
        '7' => ["█████", "    █", "   █ ", "  █  ", "  █  "],
        '8' => ["█████", "█   █", "█████", "█   █", "█████"],
        '9' => ["█████", "█   █", "█████", "    █", "█████"],
        ':' => ["   ", " █ ", "   ", " █ ", "   "],
        _ => return None,
    };
    Some(rows)
}

/// Render `text` (digits and colons) as big glyph rows. Unknown characters
/// are skipped.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<_> = text.chars().filter_map(glyph).collect();
    (0..HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dimensions() {
        let rows = render("25:00");
        assert_eq!(rows.len(), HEIGHT);
        // four 5-wide digits, a 3-wide colon, four separators
        assert!(rows.iter().all(|r| r.chars().count() == 4 * 5 + 3 + 4));
    }

    #[test]
    fn test_render_skips_unknown() {
        assert_eq!(render("1x"), render("1"));
        assert!(render("").iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_long_minutes() {
        let rows = render("120:00");
        assert_eq!(rows[0].chars().count(), 5 * 5 + 3 + 5);
    }
}
