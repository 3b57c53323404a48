//! A 5x7 bitmap font covering the seed caption (`#` and digits).

/// Glyph columns.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph rows.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance in cells, including one column of spacing.
pub const GLYPH_ADVANCE: u32 = 6;

/// Row bitmaps for `c`, top row first, bit 4 leftmost. `None` if unsupported.
#[must_use]
pub fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

/// Set cells of `c` as `(column, row)` pairs.
pub fn cells(c: char) -> impl Iterator<Item = (u32, u32)> {
    let rows = glyph(c).unwrap_or([0; 7]);
    (0..GLYPH_HEIGHT).flat_map(move |row| {
        (0..GLYPH_WIDTH).filter_map(move |col| {
            let bit = 1 << (GLYPH_WIDTH - 1 - col);
            (rows[row as usize] & bit != 0).then_some((col, row))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_charset_covered() {
        for c in "#0123456789".chars() {
            assert!(glyph(c).is_some(), "missing glyph for {c}");
            assert!(cells(c).count() > 0);
        }
        assert!(glyph('x').is_none());
        assert_eq!(cells(' ').count(), 0);
    }

    #[test]
    fn test_one_cells() {
        let one: Vec<_> = cells('1').collect();
        assert!(one.contains(&(2, 0)));
        assert!(one.contains(&(1, 1)));
        assert_eq!(one.iter().filter(|(_, row)| *row == 6).count(), 3);
    }
}
