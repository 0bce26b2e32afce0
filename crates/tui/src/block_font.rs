use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 5;
const FILL: &str = "██";
const BACKGROUND: &str = "░░";
const GAP: char = '░';

/// One bitmask per row, most significant of the low five bits is the left column.
type Glyph = [u8; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('A', [0b01110, 0b10001, 0b11111, 0b10001, 0b10001]),
        ('B', [0b11110, 0b10001, 0b11110, 0b10001, 0b11110]),
        ('C', [0b01111, 0b10000, 0b10000, 0b10000, 0b01111]),
        ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b11110]),
        ('E', [0b11111, 0b10000, 0b11110, 0b10000, 0b11111]),
        ('F', [0b11111, 0b10000, 0b11110, 0b10000, 0b10000]),
        ('G', [0b01111, 0b10000, 0b10011, 0b10001, 0b01111]),
        ('H', [0b10001, 0b10001, 0b11111, 0b10001, 0b10001]),
        ('I', [0b11111, 0b00100, 0b00100, 0b00100, 0b11111]),
        ('J', [0b00111, 0b00001, 0b00001, 0b10001, 0b01110]),
        ('K', [0b10001, 0b10010, 0b11100, 0b10010, 0b10001]),
        ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        ('M', [0b10001, 0b11011, 0b10101, 0b10001, 0b10001]),
        ('N', [0b10001, 0b11001, 0b10101, 0b10011, 0b10001]),
        ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
        ('P', [0b11110, 0b10001, 0b11110, 0b10000, 0b10000]),
        ('Q', [0b01110, 0b10001, 0b10101, 0b10010, 0b01101]),
        ('R', [0b11110, 0b10001, 0b11110, 0b10010, 0b10001]),
        ('S', [0b01111, 0b10000, 0b01110, 0b00001, 0b11110]),
        ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100]),
        ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        ('V', [0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        ('W', [0b10001, 0b10001, 0b10101, 0b11011, 0b10001]),
        ('X', [0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
        ('Y', [0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
        ('Z', [0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
        ('-', [0b00000, 0b00000, 0b11111, 0b00000, 0b00000]),
        (' ', [0b00000; FONT_HEIGHT]),
        ('?', [0b01110, 0b10001, 0b00110, 0b00000, 0b00100]),
    ])
});

/// Render `text` as block letters on a shaded background.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text
        .chars()
        .map(|ch| {
            let ch = ch.to_ascii_uppercase();
            GLYPHS.get(&ch).unwrap_or(&GLYPHS[&'?'])
        })
        .collect();
    if glyphs.is_empty() {
        return vec![String::new(); FONT_HEIGHT];
    }

    (0..FONT_HEIGHT)
        .map(|row| {
            let mut line = String::new();
            for (index, glyph) in glyphs.iter().enumerate() {
                if index > 0 {
                    line.push(GAP);
                }
                for col in (0..FONT_WIDTH).rev() {
                    let filled = glyph[row] & (1 << col) != 0;
                    line.push_str(if filled { FILL } else { BACKGROUND });
                }
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fixed_height_rows() {
        let lines = render("Bel");
        assert_eq!(lines.len(), FONT_HEIGHT);
        let width = 3 * FONT_WIDTH * 2 + 2;
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(lines[4].starts_with("████████░░"));
    }

    #[test]
    fn unknown_characters_fall_back() {
        assert_eq!(render("#"), render("?"));
        assert!(render("").iter().all(String::is_empty));
    }
}
