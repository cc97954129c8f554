use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use anyhow::{Context, Result};
use cfont_render::{FontBaker, CODE_COUNT};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::discover::FontJob;
use crate::settings::Settings;

/// Files written for one font.
#[derive(Debug)]
pub struct Written {
    pub header: PathBuf,
    pub source: PathBuf,
    pub glyphs: usize,
}

#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub result: Result<Written>,
}

/// Process every job on a bounded pool of worker threads.
///
/// A failing font does not stop the others; outcomes come back in job order.
pub fn run(jobs: &[FontJob], settings: &Settings, show_progress: bool) -> Vec<Outcome> {
    let baker = FontBaker::new(settings.emit.clone(), settings.render.bpp);
    let out_dir = settings.output.dir.as_path();
    let progress = if show_progress {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    };

    let next = AtomicUsize::new(0);
    let outcomes: Mutex<Vec<(usize, Outcome)>> = Mutex::new(Vec::with_capacity(jobs.len()));
    let workers = settings.jobs.clamp(1, jobs.len().max(1));
    debug!("processing {} fonts on {} workers", jobs.len(), workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(job) = jobs.get(index) else {
                    break;
                };

                let bar = progress.add(glyph_bar(job.name()));
                let result = process(job, &baker, out_dir, &bar)
                    .with_context(|| format!("failed to process font {:?}", job.name()));
                match &result {
                    Ok(_) => bar.finish_with_message("done"),
                    Err(_) => bar.abandon_with_message("failed"),
                }

                let outcome = Outcome { name: job.name().to_string(), result };
                outcomes.lock().push((index, outcome));
            });
        }
    });

    let mut outcomes = outcomes.into_inner();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

fn glyph_bar(name: &str) -> ProgressBar {
    let bar = ProgressBar::new(CODE_COUNT as u64);
    bar.set_style(
        ProgressStyle::with_template("{prefix:>28} [{bar:40.cyan/blue}] {pos:>3}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.set_prefix(name.to_string());
    bar
}

fn process(
    job: &FontJob,
    baker: &FontBaker,
    out_dir: &Path,
    bar: &ProgressBar,
) -> Result<Written> {
    let font = job.open()?;
    let baked = baker.bake(font.as_ref(), |_| bar.inc(1))?;

    let header = write_atomic(out_dir, &baked.module.header_name, &baked.module.header)?;
    let source = write_atomic(out_dir, &baked.module.source_name, &baked.module.source)?;
    info!(
        "{}: {} unique glyphs of {}x{} at {} bpp",
        job.name(),
        baked.table.glyphs().len(),
        baked.descriptor.public_width(),
        baked.table.height(),
        baked.descriptor.bpp
    );

    Ok(Written { header, source, glyphs: baked.table.glyphs().len() })
}

/// Write through a temporary file in `dir` so readers never see a partial file.
///
/// A replaced file keeps its permissions; a new one is readable by everyone.
pub fn write_atomic(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {:?}", dir))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {:?}", path))?;

    let permissions = match fs::metadata(&path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("failed to set permissions of {:?}", path))?;
    }

    file.persist(&path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to move {:?} into place", path))?;
    Ok(path)
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    // Temporary files are created 0600.
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use cfont_render::{RasterFont, RenderConfig};

    use super::*;

    fn bitmap_job(dir: &Path, name: &str, json: &str) -> FontJob {
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, json).unwrap();
        FontJob::Precomputed { name: name.to_string(), width: 3, path }
    }

    fn settings(out_dir: &Path, jobs: usize) -> Settings {
        let mut settings = Settings::default();
        settings.output.dir = out_dir.to_path_buf();
        settings.jobs = jobs;
        settings
    }

    #[test]
    fn writes_paired_files_for_each_font() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let jobs = vec![
            bitmap_job(input.path(), "Tiny-Font", r#"{" ": [0, 0], "x": [5, 2]}"#),
            bitmap_job(input.path(), "Other", r#"{" ": [0]}"#),
        ];

        let outcomes = run(&jobs, &settings(output.path(), 2), false);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "Tiny-Font");

        let written = outcomes[0].result.as_ref().unwrap();
        assert_eq!(written.glyphs, 2);
        let header = fs::read_to_string(&written.header).unwrap();
        let source = fs::read_to_string(&written.source).unwrap();
        assert!(header.contains("extern const uint8_t tiny_font_letters[2][2];"));
        assert!(source.starts_with("#include \"Tiny-Font.h\"\n"));
        assert!(output.path().join("Other.h").is_file());
        assert!(output.path().join("Other.c").is_file());
    }

    #[test]
    fn failures_are_isolated_per_font() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let jobs = vec![
            bitmap_job(input.path(), "Broken", r#"{"x": [1]}"#),
            bitmap_job(input.path(), "Fine", r#"{" ": [0]}"#),
            FontJob::Precomputed {
                name: "Missing".to_string(),
                width: 3,
                path: input.path().join("missing.json"),
            },
        ];

        let outcomes = run(&jobs, &settings(output.path(), 1), false);
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .map(|outcome| outcome.name.as_str())
            .collect();
        assert_eq!(failed, vec!["Broken", "Missing"]);
        assert!(output.path().join("Fine.c").is_file());
        assert!(!output.path().join("Broken.h").exists());

        let message = format!("{:#}", outcomes[0].result.as_ref().unwrap_err());
        assert!(message.contains("Broken"));
        assert!(message.contains("space glyph"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_rasterizer_is_isolated_per_font() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let render = RenderConfig { rasterizer: "false".into(), ..Default::default() };
        let jobs = vec![
            FontJob::Raster(RasterFont::new("Vector.ttf", render)),
            bitmap_job(input.path(), "Fine", r#"{" ": [0]}"#),
        ];

        let outcomes = run(&jobs, &settings(output.path(), 2), false);
        let message = format!("{:#}", outcomes[0].result.as_ref().unwrap_err());
        assert!(message.contains("Vector"));
        assert!(message.contains("rasterizer exited"));
        assert!(!output.path().join("Vector.h").exists());
        assert!(outcomes[1].result.is_ok());
        assert!(output.path().join("Fine.h").is_file());
    }

    #[test]
    fn header_publishes_configured_bpp() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let jobs = vec![bitmap_job(input.path(), "Fine", r#"{" ": [0]}"#)];

        let mut settings = settings(output.path(), 1);
        settings.render.bpp = 4;
        let outcomes = run(&jobs, &settings, false);
        let header = fs::read_to_string(&outcomes[0].result.as_ref().unwrap().header).unwrap();
        assert!(header.contains("#define FONT_BPP 4\n"));
    }

    #[test]
    fn unwritable_output_fails_the_font() {
        let input = tempfile::tempdir().unwrap();
        let jobs = vec![bitmap_job(input.path(), "Fine", r#"{" ": [0]}"#)];
        let outcomes = run(&jobs, &settings(&input.path().join("absent"), 4), false);
        assert!(outcomes[0].result.is_err());
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "old").unwrap();
        let path = write_atomic(dir.path(), "a.h", "new").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_sets_readable_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fresh = write_atomic(dir.path(), "fresh.h", "x").unwrap();
        assert_eq!(fs::metadata(fresh).unwrap().permissions().mode() & 0o777, 0o644);

        let kept = dir.path().join("kept.h");
        fs::write(&kept, "old").unwrap();
        fs::set_permissions(&kept, fs::Permissions::from_mode(0o664)).unwrap();
        write_atomic(dir.path(), "kept.h", "new").unwrap();
        assert_eq!(fs::metadata(&kept).unwrap().permissions().mode() & 0o777, 0o664);
    }
}
