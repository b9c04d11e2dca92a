//! Kween Sans - Command Line Entry Point

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use kween_studio::render::{Background, Color, FallbackFont};
use kween_studio::{
    BackgroundUpload, FileSlotStore, PersistenceStore, SlotStore, Studio, StudioConfig,
};

#[derive(Parser)]
#[command(name = "kween", version = kween_studio::VERSION, about = "Render text as glyph images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render text to a PNG
    Render {
        /// Text to render; commas start new lines
        text: String,

        /// Glyph height in pixels
        #[arg(long)]
        size: Option<u32>,

        /// Background color (#hex, rgb() or a named color)
        #[arg(long, conflicts_with = "background_image")]
        background: Option<String>,

        /// Background image file
        #[arg(long)]
        background_image: Option<PathBuf>,

        /// Save the configuration after rendering
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render the saved configuration
    Restore {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the saved configuration
    Show {
        /// Directory holding saved state
        #[arg(long, default_value = ".kween")]
        state_dir: PathBuf,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Container width in pixels
    #[arg(long)]
    width: Option<f32>,

    /// Directory holding the glyph images
    #[arg(long, default_value = "images")]
    assets: PathBuf,

    /// Font file for characters without a glyph image
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output file (defaults to a timestamped name)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Directory holding saved state
    #[arg(long, default_value = ".kween")]
    state_dir: PathBuf,
}

impl OutputArgs {
    fn settings(&self) -> StudioConfig {
        let mut settings = StudioConfig {
            asset_root: self.assets.clone(),
            state_dir: self.state_dir.clone(),
            ..StudioConfig::default()
        };
        if let Some(width) = self.width {
            settings.container_width = width;
        }
        settings
    }

    fn font(&self) -> Result<FallbackFont> {
        if let Some(path) = &self.font {
            return FallbackFont::from_file(path)
                .with_context(|| format!("failed to load font {}", path.display()));
        }
        Ok(FallbackFont::system().unwrap_or_else(|| {
            tracing::warn!("no system sans-serif font found, fallback glyphs drawn as boxes");
            FallbackFont::none()
        }))
    }

    fn studio(&self) -> Result<Studio<FileSlotStore>> {
        let store = FileSlotStore::new(&self.state_dir);
        let mut studio = Studio::new(self.settings(), store).with_font(self.font()?);
        studio.init()?;
        Ok(studio)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            text,
            size,
            background,
            background_image,
            save,
            output,
        } => {
            let mut studio = output.studio()?;
            studio.set_text(text);
            if let Some(size) = size {
                studio.set_glyph_height(size)?;
            }
            if let Some(value) = background {
                let Some(color) = Color::parse(&value) else {
                    bail!("invalid background color: {value}");
                };
                studio.set_background_color(color);
            }
            if let Some(path) = background_image {
                let upload = BackgroundUpload::from_path(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let uploaded = studio.upload_background(&upload);
                report(&mut studio);
                uploaded?;
            }
            studio.generate()?;
            export(&mut studio, output.out.as_deref())?;
            if save {
                studio.save()?;
            }
            report(&mut studio);
        }
        Command::Restore { output } => {
            let mut studio = output.studio()?;
            export(&mut studio, output.out.as_deref())?;
            report(&mut studio);
        }
        Command::Show { state_dir } => show(&state_dir),
    }

    Ok(())
}

fn export<S: SlotStore>(studio: &mut Studio<S>, out: Option<&Path>) -> Result<()> {
    let exported = smol::block_on(studio.export());
    report(studio);
    let exported = exported?;

    let path = match out {
        Some(path) => {
            std::fs::write(path, &exported.bytes)?;
            path.to_path_buf()
        }
        None => exported.save_to(".")?,
    };
    println!(
        "{} ({}x{}, {})",
        path.display(),
        exported.width,
        exported.height,
        exported.mime_type
    );
    Ok(())
}

fn report<S: SlotStore>(studio: &mut Studio<S>) {
    for notice in studio.drain_notices() {
        if notice.is_alert() {
            eprintln!("error: {}", notice.message());
        } else {
            eprintln!("{}", notice.message());
        }
    }
}

fn show(state_dir: &Path) {
    let store = PersistenceStore::new(FileSlotStore::new(state_dir), StudioConfig::default().slot);
    let Some(config) = store.load() else {
        println!("No saved configuration in {}", state_dir.display());
        return;
    };

    println!("text:       {:?}", config.text);
    println!("size:       {}px", config.glyph_height);
    match &config.background {
        Background::Color(color) => println!("background: {}", color.to_hex()),
        Background::Image(image) => println!("background: {}", image.path().display()),
    }
}
