mod config;
mod emit;
mod glyph;
mod source;

use std::io;
use std::process::ExitStatus;

pub use config::{EmitOptions, RenderConfig};
pub use emit::{
    emit, ident::snake_case_identifier, is_valid_file_stem, table_names, CModule,
};
pub use glyph::{
    bitmap::GlyphBitmap,
    charset::{is_printable, latin1, printable_or_space},
    table::{GlyphTable, CODE_COUNT},
};
pub use source::{
    precomputed::PrecomputedFont,
    raster::{escape_label, shell_line, RasterFont},
    rows::{encode_row, ink_level},
    FontDescriptor, GlyphSource, Primitive,
};

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to launch rasterizer `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("rasterizer exited with {status} while rendering {ch:?}: {stderr}")]
    Rasterizer { ch: char, status: ExitStatus, stderr: String },
    #[error("failed to decode rasterized glyph {ch:?}: {source}")]
    Image { ch: char, source: image::ImageError },
    #[error("rasterized glyph {ch:?} is {actual} px wide, expected {expected}")]
    RasterWidth { ch: char, expected: u32, actual: u32 },
    #[error("failed to parse bitmap font: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("bitmap font {font:?} key {key:?} is not a single character")]
    InvalidKey { font: String, key: String },
    #[error("row {row:#x} of {ch:?} does not fit in {width} pixels")]
    RowTooWide { ch: char, row: u64, width: u32 },
    #[error("font {font:?} has no space glyph to fall back on")]
    MissingFallback { font: String },
    #[error("glyph {ch:?} has {actual} rows, expected {expected}")]
    RaggedGlyph { ch: char, expected: usize, actual: usize },
    #[error("glyph {ch:?} has no rows")]
    EmptyGlyph { ch: char },
    #[error("font {font:?}: width {width} is not supported")]
    InvalidWidth { font: String, width: u32 },
    #[error("font {font:?}: {bpp} bits per pixel is not supported")]
    InvalidBpp { font: String, bpp: u32 },
    #[error("font {font:?}: no integer type of 8, 16, 32 or 64 bits holds a {row_bits} bit row")]
    PrimitiveWidth { font: String, row_bits: u32 },
}

/// Everything produced for one font.
#[derive(Clone, Debug)]
pub struct BakedFont {
    pub descriptor: FontDescriptor,
    pub table: GlyphTable,
    pub module: CModule,
}

/// Runs the render, dedupe and emit stages for one font.
#[derive(Clone, Debug)]
pub struct FontBaker {
    options: EmitOptions,
    /// Run-wide bit depth published as `FONT_BPP`.
    bpp: u32,
}

impl Default for FontBaker {
    fn default() -> Self {
        Self::new(EmitOptions::default(), RenderConfig::default().bpp)
    }
}

impl FontBaker {
    pub fn new(options: EmitOptions, bpp: u32) -> Self {
        Self { options, bpp }
    }

    pub fn bake<S, F>(&self, source: &S, progress: F) -> Result<BakedFont, FontError>
    where
        S: GlyphSource + ?Sized,
        F: FnMut(u8),
    {
        let descriptor = source.descriptor()?;
        let table = GlyphTable::build(source, progress)?;
        let bpp = if self.options.source_bpp { descriptor.bpp } else { self.bpp };
        let module = emit(&descriptor, &table, bpp, &self.options);
        Ok(BakedFont { descriptor, table, module })
    }
}
