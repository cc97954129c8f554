use log::trace;

use super::bitmap::GlyphBitmap;
use super::charset::latin1;
use crate::source::GlyphSource;
use crate::FontError;

/// Number of single-byte character codes.
pub const CODE_COUNT: usize = 256;

/// Deduplicated glyphs of one font plus the code to glyph index mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: Vec<GlyphBitmap>,
    mapping: [u8; CODE_COUNT],
}

impl GlyphTable {
    /// Render every byte value through `source`, calling `progress` after each one.
    pub fn build<S, F>(source: &S, mut progress: F) -> Result<Self, FontError>
    where
        S: GlyphSource + ?Sized,
        F: FnMut(u8),
    {
        let mut glyphs: Vec<GlyphBitmap> = Vec::new();
        let mut mapping = [0u8; CODE_COUNT];

        for code in 0..=u8::MAX {
            let ch = latin1(code);
            let glyph = source.render(ch)?;

            if let Some(first) = glyphs.first() {
                if first.height() != glyph.height() {
                    return Err(FontError::RaggedGlyph {
                        ch,
                        expected: first.height(),
                        actual: glyph.height(),
                    });
                }
            } else if glyph.height() == 0 {
                return Err(FontError::EmptyGlyph { ch });
            }

            let index = match glyphs.iter().position(|known| *known == glyph) {
                Some(index) => index,
                None => {
                    glyphs.push(glyph);
                    glyphs.len() - 1
                },
            };

            // At most 256 distinct glyphs exist, so every index fits a byte.
            mapping[usize::from(code)] = index as u8;
            trace!("{}: {:#04x} -> glyph {}", source.name(), code, index);
            progress(code);
        }

        Ok(Self { glyphs, mapping })
    }

    pub fn glyphs(&self) -> &[GlyphBitmap] {
        &self.glyphs
    }

    pub fn mapping(&self) -> &[u8; CODE_COUNT] {
        &self.mapping
    }

    /// Rows per glyph.
    pub fn height(&self) -> usize {
        self.glyphs.first().map_or(0, GlyphBitmap::height)
    }

    pub fn glyph_for(&self, code: u8) -> &GlyphBitmap {
        &self.glyphs[usize::from(self.mapping[usize::from(code)])]
    }
}
