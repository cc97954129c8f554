/// Rendered glyph, one packed row value per scanline from top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    rows: Vec<u64>,
}

impl GlyphBitmap {
    pub fn new(rows: Vec<u64>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Unpack row `index` into `columns` pixel levels, leftmost pixel first.
    pub fn pixels(&self, index: usize, columns: u32, bpp: u32) -> Vec<u8> {
        let row = self.rows[index];
        let mask = (1u64 << bpp) - 1;
        (0..columns)
            .rev()
            .map(|column| {
                let shift = column * bpp;
                if shift >= u64::BITS {
                    0
                } else {
                    ((row >> shift) & mask) as u8
                }
            })
            .collect()
    }

    /// Text rendering of the glyph for terminal previews.
    pub fn shaded_rows(&self, columns: u32, bpp: u32) -> impl Iterator<Item = String> + '_ {
        let max_level = ((1u32 << bpp) - 1).max(1);
        (0..self.rows.len()).map(move |index| {
            self.pixels(index, columns, bpp)
                .into_iter()
                .map(|level| shade(u32::from(level), max_level))
                .collect::<String>()
        })
    }
}

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

fn shade(level: u32, max_level: u32) -> char {
    let levels = (SHADES.len() - 1) as u32;
    let index = (level * levels + max_level / 2) / max_level;
    SHADES[(index as usize).min(SHADES.len() - 1)]
}
