//! Settings file handling.
//!
//! Settings are read from a TOML file (`cfont.toml` in the working directory
//! unless `--config` names another one). Every field has a default, so an
//! empty or missing file reproduces the stock layout: vector fonts from
//! `fonts/*.ttf`, the `Noto-Sans-Mono-Regular` system font and the `monogram`
//! bitmap font, written to `headers/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cfont_render::{EmitOptions, FontDescriptor, RenderConfig};
use log::{debug, info};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "cfont.toml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Number of fonts processed concurrently.
    pub jobs: usize,
    pub render: RenderConfig,
    pub emit: EmitOptions,
    pub output: OutputSettings,
    pub fonts: FontSettings,
    pub precomputed: Vec<PrecomputedSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: 16,
            render: RenderConfig::default(),
            emit: EmitOptions::default(),
            output: OutputSettings::default(),
            fonts: FontSettings::default(),
            precomputed: vec![PrecomputedSettings {
                name: "monogram".to_string(),
                width: 5,
                path: PathBuf::from("fonts/monogram-bitmap.json"),
            }],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Directory receiving the generated `.h` and `.c` files.
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { dir: PathBuf::from("headers") }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSettings {
    /// Directory scanned for vector font files.
    pub dir: PathBuf,
    /// File extensions picked up from `dir`, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Descend into subdirectories of `dir`.
    pub recursive: bool,
    /// Fonts resolved by the rasterizer itself rather than from a file.
    pub named: Vec<String>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("fonts"),
            extensions: vec!["ttf".to_string()],
            recursive: false,
            named: vec!["Noto-Sans-Mono-Regular".to_string()],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrecomputedSettings {
    pub name: String,
    /// Glyph width in pixels, excluding the padding column.
    pub width: u32,
    /// JSON file mapping characters to row lists.
    pub path: PathBuf,
}

impl Settings {
    /// Load `path`, or the default settings file when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if !fallback.is_file() {
                    debug!("no {DEFAULT_SETTINGS_FILE} found, using built-in settings");
                    return Ok(Self::default());
                }
                fallback
            },
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings {:?}", path))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("failed to parse settings {:?}", path))?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reject configurations that cannot produce any valid output.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            anyhow::bail!("jobs must be at least 1");
        }

        FontDescriptor::new("vector fonts", self.render.width, self.render.bpp, 0)
            .context("invalid [render] settings")?;

        for font in &self.precomputed {
            FontDescriptor::new(&font.name, font.width, 1, 1)
                .with_context(|| format!("invalid [[precomputed]] font {:?}", font.name))?;
        }

        Ok(())
    }
}
