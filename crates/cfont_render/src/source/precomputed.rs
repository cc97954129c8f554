use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::GlyphSource;
use crate::glyph::bitmap::GlyphBitmap;
use crate::glyph::charset::printable_or_space;
use crate::FontError;

/// Hand-drawn 1 bpp font stored as JSON: `{"A": [row, row, ...], ...}`.
///
/// Each stored row holds the leftmost pixel in its least significant bit.
#[derive(Clone, Debug)]
pub struct PrecomputedFont {
    name: String,
    width: u32,
    glyphs: HashMap<char, GlyphBitmap>,
}

impl PrecomputedFont {
    pub fn open<P: AsRef<Path>>(
        name: impl Into<String>,
        width: u32,
        path: P,
    ) -> Result<Self, FontError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(name, width, BufReader::new(file))
    }

    pub fn from_reader<R: Read>(
        name: impl Into<String>,
        width: u32,
        reader: R,
    ) -> Result<Self, FontError> {
        let name = name.into();
        if width == 0 || width > u64::BITS {
            return Err(FontError::InvalidWidth { font: name, width });
        }

        let data: HashMap<String, Vec<u64>> = serde_json::from_reader(reader)?;

        let mut glyphs = HashMap::with_capacity(data.len());
        for (key, rows) in data {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return Err(FontError::InvalidKey { font: name, key }),
            };

            let rows = rows
                .into_iter()
                .map(|row| {
                    reverse_row(row, width).ok_or(FontError::RowTooWide { ch, row, width })
                })
                .collect::<Result<Vec<_>, _>>()?;
            glyphs.insert(ch, GlyphBitmap::new(rows));
        }

        if !glyphs.contains_key(&' ') {
            return Err(FontError::MissingFallback { font: name });
        }

        debug!("loaded {} glyphs for bitmap font {}", glyphs.len(), name);
        Ok(Self { name, width, glyphs })
    }
}

impl GlyphSource for PrecomputedFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn bpp(&self) -> u32 {
        1
    }

    /// One leading padding column per row.
    fn offset(&self) -> u32 {
        1
    }

    fn render(&self, ch: char) -> Result<GlyphBitmap, FontError> {
        self.glyphs
            .get(&printable_or_space(ch))
            .or_else(|| self.glyphs.get(&' '))
            .cloned()
            .ok_or_else(|| FontError::MissingFallback { font: self.name.clone() })
    }
}

/// Reverse the low `width` bits of `row`, or `None` if `row` is wider.
fn reverse_row(row: u64, width: u32) -> Option<u64> {
    if width < u64::BITS && row >> width != 0 {
        return None;
    }
    Some(row.reverse_bits() >> (u64::BITS - width))
}
