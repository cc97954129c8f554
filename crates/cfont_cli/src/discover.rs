use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use cfont_render::{
    is_valid_file_stem, FontDescriptor, FontError, GlyphSource, PrecomputedFont, RasterFont,
    RenderConfig,
};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::settings::Settings;

/// One font scheduled for processing.
#[derive(Clone, Debug)]
pub enum FontJob {
    Raster(RasterFont),
    Precomputed { name: String, width: u32, path: PathBuf },
}

impl FontJob {
    pub fn name(&self) -> &str {
        match self {
            FontJob::Raster(font) => font.name(),
            FontJob::Precomputed { name, .. } => name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FontJob::Raster(_) => "vector",
            FontJob::Precomputed { .. } => "bitmap",
        }
    }

    /// Descriptor known without loading any glyph data.
    pub fn descriptor(&self) -> Result<FontDescriptor, FontError> {
        match self {
            FontJob::Raster(font) => font.descriptor(),
            FontJob::Precomputed { name, width, .. } => FontDescriptor::new(name, *width, 1, 1),
        }
    }

    pub fn open(&self) -> Result<Box<dyn GlyphSource>, FontError> {
        match self {
            FontJob::Raster(font) => Ok(Box::new(font.clone())),
            FontJob::Precomputed { name, width, path } => {
                Ok(Box::new(PrecomputedFont::open(name.clone(), *width, path)?))
            },
        }
    }
}

/// Build the work list: vector font files, named fonts, then bitmap fonts.
pub fn discover(settings: &Settings) -> Result<Vec<FontJob>> {
    let mut jobs: Vec<FontJob> = font_files(settings)
        .into_iter()
        .map(|path| raster_job(path.into_os_string(), &settings.render))
        .collect();

    jobs.extend(
        settings.fonts.named.iter().map(|name| raster_job(name.as_str(), &settings.render)),
    );

    jobs.extend(settings.precomputed.iter().map(|font| FontJob::Precomputed {
        name: font.name.clone(),
        width: font.width,
        path: font.path.clone(),
    }));

    check_unique(&jobs)?;
    Ok(jobs)
}

fn raster_job(font: impl Into<OsString>, render: &RenderConfig) -> FontJob {
    FontJob::Raster(RasterFont::new(font, render.clone()))
}

fn font_files(settings: &Settings) -> Vec<PathBuf> {
    let dir = &settings.fonts.dir;
    if !dir.is_dir() {
        warn!("font directory {:?} does not exist", dir);
        return Vec::new();
    }

    let max_depth = if settings.fonts.recursive { usize::MAX } else { 1 };
    let mut entries: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| has_extension(path, &settings.fonts.extensions))
        .collect();
    entries.sort();
    debug!("found {} font files in {:?}", entries.len(), dir);
    entries
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

/// Two fonts must never write the same files or define the same C symbols.
fn check_unique(jobs: &[FontJob]) -> Result<()> {
    let mut names: HashMap<String, &str> = HashMap::new();
    let mut identifiers: HashMap<String, &str> = HashMap::new();

    for job in jobs {
        let name = job.name();
        if !is_valid_file_stem(name) {
            anyhow::bail!("font name {:?} cannot be used as an output file name", name);
        }
        if let Some(previous) = names.insert(name.to_ascii_lowercase(), name) {
            anyhow::bail!("fonts {:?} and {:?} would write the same output files", previous, name);
        }

        let identifier = cfont_render::snake_case_identifier(name);
        if let Some(previous) = identifiers.insert(identifier.clone(), name) {
            anyhow::bail!(
                "fonts {:?} and {:?} both map to the C identifier {:?}",
                previous,
                name,
                identifier
            );
        }
    }

    Ok(())
}
