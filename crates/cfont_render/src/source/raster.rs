use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use image::ImageFormat;
use log::{debug, trace};

use super::rows::{encode_grid, quantize};
use super::GlyphSource;
use crate::config::RenderConfig;
use crate::glyph::bitmap::GlyphBitmap;
use crate::glyph::charset::printable_or_space;
use crate::FontError;

/// Vector font rendered glyph by glyph through an external rasterizer.
#[derive(Clone, Debug)]
pub struct RasterFont {
    /// Font file path or rasterizer font name, passed through unchanged.
    font: OsString,
    name: String,
    config: RenderConfig,
}

impl RasterFont {
    pub fn new(font: impl Into<OsString>, config: RenderConfig) -> Self {
        let font = font.into();
        let name = Path::new(&font)
            .file_stem()
            .unwrap_or(font.as_os_str())
            .to_string_lossy()
            .into_owned();
        Self { font, name, config }
    }

    pub fn font(&self) -> &OsStr {
        &self.font
    }

    /// Arguments passed to the rasterizer for one character.
    pub fn arguments(&self, ch: char) -> Vec<OsString> {
        vec![
            "-geometry".into(),
            format!("{}x", self.config.width).into(),
            "-font".into(),
            self.font.clone(),
            "-pointsize".into(),
            self.config.point_size.to_string().into(),
            format!("label:{}", escape_label(ch)).into(),
            "-depth".into(),
            self.config.bpp.to_string().into(),
            "png:-".into(),
        ]
    }

    fn rasterize(&self, ch: char) -> Result<Vec<u8>, FontError> {
        let arguments = self.arguments(ch);
        debug!("{}", shell_line(&self.config.rasterizer, &arguments));

        let output = Command::new(&self.config.rasterizer).args(&arguments).output().map_err(
            |source| FontError::Spawn { program: self.config.rasterizer.clone(), source },
        )?;

        if !output.status.success() {
            return Err(FontError::Rasterizer {
                ch,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        trace!("{} rendered {:?} to {} bytes", self.name, ch, output.stdout.len());
        Ok(output.stdout)
    }

    /// Decode rasterizer output into a glyph.
    pub fn decode(&self, ch: char, png: &[u8]) -> Result<GlyphBitmap, FontError> {
        let image = image::load_from_memory_with_format(png, ImageFormat::Png)
            .map_err(|source| FontError::Image { ch, source })?;

        if image.width() != self.config.width {
            return Err(FontError::RasterWidth {
                ch,
                expected: self.config.width,
                actual: image.width(),
            });
        }

        let grid = quantize(&image, self.config.bpp);
        Ok(GlyphBitmap::new(encode_grid(&grid, self.config.bpp)))
    }
}

impl GlyphSource for RasterFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.config.width
    }

    fn bpp(&self) -> u32 {
        self.config.bpp
    }

    fn render(&self, ch: char) -> Result<GlyphBitmap, FontError> {
        let ch = printable_or_space(ch);
        let png = self.rasterize(ch)?;
        self.decode(ch, &png)
    }
}

/// Escape a character for ImageMagick's `label:` text syntax.
pub fn escape_label(ch: char) -> String {
    match ch {
        '\\' => "\\\\".to_string(),
        ' ' => "\\ ".to_string(),
        // A leading `@` makes the rasterizer read the label from a file.
        '@' => "\\@".to_string(),
        _ => ch.to_string(),
    }
}

/// Equivalent POSIX shell command line, for logging.
pub fn shell_line(program: &str, arguments: &[OsString]) -> String {
    std::iter::once(Cow::Borrowed(program))
        .chain(arguments.iter().map(|argument| argument.to_string_lossy()))
        .map(|word| shell_quote(&word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\"'\"'"))
    }
}
