//! Built-in 3x5 bitmap digits for stamping region numbers into images

/// Glyph width in font cells
pub const GLYPH_WIDTH: u32 = 3;
/// Glyph height in font cells
pub const GLYPH_HEIGHT: u32 = 5;

// One byte per row, the three low bits are the columns from left to right
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Pixels per font cell for a font size
///
/// Sizes below two glyph heights render at one pixel per cell.
pub const fn cell_scale(font_size: u32) -> u32 {
    let scale = font_size / GLYPH_HEIGHT;
    if scale == 0 { 1 } else { scale }
}

/// Bitmap rows of a digit, `None` for any other character
pub fn glyph(ch: char) -> Option<[u8; 5]> {
    let digit = ch.to_digit(10)?;
    DIGITS.get(digit as usize).copied()
}

/// Pixel offsets covered by `text` rendered at `font_size`
///
/// Offsets are relative to the top-left corner of the text. Glyphs are one
/// cell apart; characters without a glyph leave a blank of glyph width.
pub fn text_offsets(text: &str, font_size: u32) -> Vec<(u32, u32)> {
    let scale = cell_scale(font_size);
    let advance = (GLYPH_WIDTH + 1) * scale;
    let mut offsets = Vec::new();

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let origin_x = i as u32 * advance;

        for (row, bits) in (0u32..).zip(rows) {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        offsets.push((origin_x + col * scale + dx, row * scale + dy));
                    }
                }
            }
        }
    }

    offsets
}

/// Size in pixels of `text` rendered at `font_size`
pub fn text_extent(text: &str, font_size: u32) -> (u32, u32) {
    let scale = cell_scale(font_size);
    let count = text.chars().count() as u32;
    if count == 0 {
        return (0, 0);
    }
    let width = count * (GLYPH_WIDTH + 1) * scale - scale;
    (width, GLYPH_HEIGHT * scale)
}
