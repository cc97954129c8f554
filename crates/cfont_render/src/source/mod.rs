pub mod precomputed;
pub mod raster;
pub mod rows;

use crate::emit::ident::snake_case_identifier;
use crate::glyph::bitmap::GlyphBitmap;
use crate::FontError;

/// Anything that can render single characters of one font to row bitmaps.
pub trait GlyphSource {
    /// Font name, used for output file names and the C identifier prefix.
    fn name(&self) -> &str;

    /// Width in pixels of a rendered glyph.
    fn width(&self) -> u32;

    fn bpp(&self) -> u32;

    /// Padding columns added to the published glyph width.
    fn offset(&self) -> u32 {
        0
    }

    fn render(&self, ch: char) -> Result<GlyphBitmap, FontError>;

    fn descriptor(&self) -> Result<FontDescriptor, FontError> {
        FontDescriptor::new(self.name(), self.width(), self.bpp(), self.offset())
    }
}

/// Unsigned integer type holding one packed glyph row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Primitive {
    U8,
    U16,
    U32,
    U64,
}

impl Primitive {
    const ALL: [Primitive; 4] = [Primitive::U8, Primitive::U16, Primitive::U32, Primitive::U64];

    /// Smallest primitive with at least `bits` bits.
    pub fn fitting(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|primitive| primitive.bits() >= bits)
    }

    pub fn bits(self) -> u32 {
        match self {
            Primitive::U8 => 8,
            Primitive::U16 => 16,
            Primitive::U32 => 32,
            Primitive::U64 => 64,
        }
    }

    pub fn c_type(self) -> &'static str {
        match self {
            Primitive::U8 => "uint8_t",
            Primitive::U16 => "uint16_t",
            Primitive::U32 => "uint32_t",
            Primitive::U64 => "uint64_t",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDescriptor {
    pub name: String,
    /// C identifier prefix derived from `name`.
    pub identifier: String,
    pub width: u32,
    pub bpp: u32,
    pub offset: u32,
    pub primitive: Primitive,
}

impl FontDescriptor {
    pub fn new(name: &str, width: u32, bpp: u32, offset: u32) -> Result<Self, FontError> {
        if width == 0 {
            return Err(FontError::InvalidWidth { font: name.to_string(), width });
        }
        if !(1..=8).contains(&bpp) {
            return Err(FontError::InvalidBpp { font: name.to_string(), bpp });
        }

        let row_bits = bpp.saturating_mul(width.saturating_add(offset));
        let primitive = Primitive::fitting(row_bits)
            .ok_or_else(|| FontError::PrimitiveWidth { font: name.to_string(), row_bits })?;

        Ok(Self {
            name: name.to_string(),
            identifier: snake_case_identifier(name),
            width,
            bpp,
            offset,
            primitive,
        })
    }

    /// Width published in the generated header.
    pub fn public_width(&self) -> u32 {
        self.width + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_is_smallest_fit() {
        assert_eq!(Primitive::fitting(1), Some(Primitive::U8));
        assert_eq!(Primitive::fitting(8), Some(Primitive::U8));
        assert_eq!(Primitive::fitting(9), Some(Primitive::U16));
        assert_eq!(Primitive::fitting(24), Some(Primitive::U32));
        assert_eq!(Primitive::fitting(64), Some(Primitive::U64));
        assert_eq!(Primitive::fitting(65), None);
    }

    #[test]
    fn descriptor_accounts_for_offset_and_bpp() {
        let raster = FontDescriptor::new("Noto-Sans-Mono-Regular", 12, 2, 0).unwrap();
        assert_eq!(raster.primitive, Primitive::U32);
        assert_eq!(raster.public_width(), 12);
        assert_eq!(raster.identifier, "noto_sans_mono_regular");

        let monogram = FontDescriptor::new("monogram", 5, 1, 1).unwrap();
        assert_eq!(monogram.primitive, Primitive::U8);
        assert_eq!(monogram.public_width(), 6);

        let padded = FontDescriptor::new("wide", 8, 1, 1).unwrap();
        assert_eq!(padded.primitive, Primitive::U16);
    }

    #[test]
    fn oversized_rows_are_a_configuration_error() {
        let err = FontDescriptor::new("huge", 40, 2, 0).unwrap_err();
        assert!(matches!(err, FontError::PrimitiveWidth { row_bits: 80, .. }));
    }

    #[test]
    fn bpp_outside_byte_range_is_rejected() {
        assert!(matches!(
            FontDescriptor::new("f", 4, 0, 0),
            Err(FontError::InvalidBpp { bpp: 0, .. })
        ));
        assert!(matches!(
            FontDescriptor::new("f", 4, 9, 0),
            Err(FontError::InvalidBpp { bpp: 9, .. })
        ));
    }
}
