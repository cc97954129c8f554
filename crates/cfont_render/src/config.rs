use serde::Deserialize;

/// Rasterizer settings shared by every vector font in a run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Target glyph width in pixels.
    pub width: u32,
    /// Bits per pixel of rasterized glyphs.
    pub bpp: u32,
    /// Point size passed to the rasterizer.
    pub point_size: u32,
    /// Rasterizer executable (ImageMagick `convert` compatible).
    pub rasterizer: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { width: 12, bpp: 2, point_size: 30, rasterizer: "convert".to_string() }
    }
}

/// Controls the generated C text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitOptions {
    /// Author line in the generated file comment.
    pub author: Option<String>,
    /// Declare the tables `const` so they can live in flash.
    pub const_tables: bool,
    /// Publish each font's own bit depth as `FONT_BPP` instead of the run's
    /// configured one.
    pub source_bpp: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { author: None, const_tables: true, source_bpp: false }
    }
}
