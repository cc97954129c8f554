mod batch;
mod discover;
mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cfont_render::{GlyphSource, RasterFont};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use discover::FontJob;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bake fonts into C row-bitmap tables")]
struct Cli {
    /// Settings file (defaults to ./cfont.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every configured font and write the .h/.c pairs
    Build(BuildArgs),
    /// Show the fonts a build would process
    List(Overrides),
    /// Print glyphs of a single font to the terminal
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Output directory for generated files
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// Number of fonts processed concurrently
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Author line for the generated file comment
    #[arg(long)]
    author: Option<String>,
    /// Hide the per-font progress bars
    #[arg(long, default_value_t = false)]
    no_progress: bool,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Args, Debug, Clone)]
struct Overrides {
    /// Glyph width in pixels for vector fonts
    #[arg(long)]
    width: Option<u32>,
    /// Bits per pixel for vector fonts
    #[arg(long)]
    bpp: Option<u32>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Font file, rasterizer font name, or bitmap font name with --bitmap
    font: String,
    /// Characters to render
    #[arg(long, default_value = "AaQg@#1")]
    chars: String,
    /// Treat the font as a JSON bitmap font stored at this path
    #[arg(long)]
    bitmap: Option<PathBuf>,
    /// Glyph width of the bitmap font
    #[arg(long, default_value_t = 5)]
    bitmap_width: u32,
    #[command(flatten)]
    overrides: Overrides,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Build(args) => build(args, settings),
        Commands::List(overrides) => {
            overrides.apply(&mut settings);
            list(settings)
        },
        Commands::Preview(args) => {
            args.overrides.apply(&mut settings);
            preview(args, settings)
        },
    }
}

fn build(args: BuildArgs, mut settings: Settings) -> Result<()> {
    args.overrides.apply(&mut settings);
    if let Some(out_dir) = args.out_dir {
        settings.output.dir = out_dir;
    }
    if let Some(jobs) = args.jobs {
        settings.jobs = jobs;
    }
    if args.author.is_some() {
        settings.emit.author = args.author;
    }
    settings.validate()?;

    let jobs = discover::discover(&settings)?;
    if jobs.is_empty() {
        anyhow::bail!("no fonts found");
    }

    fs::create_dir_all(&settings.output.dir).with_context(|| {
        format!("failed to create output directory {:?}", settings.output.dir)
    })?;

    let outcomes = batch::run(&jobs, &settings, !args.no_progress);

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(written) => info!(
                "{}: wrote {} and {} ({} glyphs)",
                outcome.name,
                written.header.display(),
                written.source.display(),
                written.glyphs
            ),
            Err(err) => {
                failures += 1;
                error!("{err:#}");
            },
        }
    }

    println!(
        "{} of {} fonts written to {:?}",
        outcomes.len() - failures,
        outcomes.len(),
        settings.output.dir
    );
    if failures > 0 {
        anyhow::bail!("{failures} font(s) failed");
    }
    Ok(())
}

fn list(settings: Settings) -> Result<()> {
    settings.validate()?;
    let jobs = discover::discover(&settings)?;

    println!(
        "{:<32} {:<32} {:<7} {:>5} {:>3} {:>6}",
        "font", "identifier", "kind", "width", "bpp", "row"
    );
    for job in &jobs {
        let descriptor = job.descriptor()?;
        println!(
            "{:<32} {:<32} {:<7} {:>5} {:>3} {:>6}",
            job.name(),
            descriptor.identifier,
            job.kind(),
            descriptor.public_width(),
            descriptor.bpp,
            descriptor.primitive.c_type()
        );
    }
    Ok(())
}

fn preview(args: PreviewArgs, settings: Settings) -> Result<()> {
    let job = match args.bitmap {
        Some(path) => FontJob::Precomputed { name: args.font, width: args.bitmap_width, path },
        None => {
            settings.validate()?;
            FontJob::Raster(RasterFont::new(args.font, settings.render.clone()))
        },
    };
    job.descriptor()?;
    let font = job.open().with_context(|| format!("failed to open font {:?}", job.name()))?;

    for ch in args.chars.chars() {
        let glyph = font
            .render(ch)
            .with_context(|| format!("failed to render {:?} with {}", ch, font.name()))?;
        println!("{:?} ({} rows)", ch, glyph.height());
        for row in glyph.shaded_rows(font.width(), font.bpp()) {
            println!("|{}|", row);
        }
    }

    Ok(())
}

impl Overrides {
    fn apply(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.render.width = width;
        }
        if let Some(bpp) = self.bpp {
            settings.render.bpp = bpp;
        }
    }
}
