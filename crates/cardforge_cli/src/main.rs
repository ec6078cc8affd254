//! Cardforge CLI
//!
//! Export, render and manage card styles from the command line.

use anyhow::{Context, Result};
use cardforge_core::{
    from_json_text, to_json_text, EditAction, EditorState, FileStorage, SavedStyleStore,
    StyleConfig, TemplateId, PALETTES,
};
use cardforge_paint::{FontBook, PixmapCanvas, Rasterizer};
use cardforge_style::{compute, to_css_text, to_utility_class_text};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{parse_image_format, CardforgeConfig};

#[derive(Parser)]
#[command(name = "cardforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Card style editor toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding cardforge.toml and the style store
    #[arg(long, global = true, default_value = ".")]
    workdir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CSS stylesheet for a style
    Css {
        /// Style JSON document (default style when omitted)
        input: Option<PathBuf>,

        /// Rule selector
        #[arg(long)]
        selector: Option<String>,

        /// Emit minified CSS
        #[arg(long)]
        minify: bool,

        /// Add the responsive media block
        #[arg(long)]
        responsive: bool,

        /// Omit the :hover block
        #[arg(long)]
        no_hover: bool,

        /// Omit @keyframes
        #[arg(long)]
        no_animations: bool,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the utility-class approximation of a style
    Classes {
        input: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the normalized JSON document of a style
    Json {
        input: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the computed style properties as JSON
    Preview {
        input: Option<PathBuf>,
    },

    /// Rasterize a style to an image file
    Render {
        input: Option<PathBuf>,

        /// Image format (png, jpeg, webp)
        #[arg(short, long)]
        format: Option<String>,

        /// Lossy quality, 0 to 1
        #[arg(short, long)]
        quality: Option<f32>,

        /// Device pixels per CSS pixel
        #[arg(long)]
        scale: Option<f32>,

        /// Directory for the image file
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Extra font file for card text
        #[arg(long)]
        font: Vec<PathBuf>,
    },

    /// Apply edits to a style and print the resulting document
    Edit {
        input: Option<PathBuf>,

        /// Template to apply first
        #[arg(short, long)]
        template: Option<TemplateId>,

        /// Palette to apply after the template
        #[arg(short, long)]
        palette: Option<String>,

        /// Field edit as key=value (repeatable)
        #[arg(short, long = "set", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// Undo this many edits at the end
        #[arg(long, default_value = "0")]
        undo: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in templates
    Templates,

    /// List the built-in palettes
    Palettes,

    /// Manage saved styles
    Styles {
        #[command(subcommand)]
        command: StyleCommands,
    },
}

#[derive(Subcommand)]
enum StyleCommands {
    /// List saved styles
    List,

    /// Save a style under a name
    Save {
        /// Style name
        name: String,

        input: Option<PathBuf>,
    },

    /// Print a saved style's JSON document
    Show {
        id: i64,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a saved style
    Delete { id: i64 },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = CardforgeConfig::load_from_dir(&cli.workdir)?;

    match cli.command {
        Commands::Css {
            input,
            selector,
            minify,
            responsive,
            no_hover,
            no_animations,
            output,
        } => {
            let mut options = settings.css.to_options();
            if let Some(selector) = selector {
                options.selector = selector;
            }
            options.minify |= minify;
            options.include_responsive |= responsive;
            options.include_hover &= !no_hover;
            options.include_animations &= !no_animations;

            let style = load_style(input.as_deref())?;
            emit(&to_css_text(&style, &compute(&style), &options), output.as_deref())
        }

        Commands::Classes { input, output } => {
            let style = load_style(input.as_deref())?;
            emit(&to_utility_class_text(&style, &compute(&style)), output.as_deref())
        }

        Commands::Json { input, output } => {
            let style = load_style(input.as_deref())?;
            emit(&to_json_text(&style)?, output.as_deref())
        }

        Commands::Preview { input } => {
            let style = load_style(input.as_deref())?;
            let preview = serde_json::to_string_pretty(&compute(&style))
                .context("Failed to serialize computed style")?;
            emit(&preview, None)
        }

        Commands::Render {
            input,
            format,
            quality,
            scale,
            out_dir,
            font,
        } => cmd_render(
            &settings,
            &cli.workdir,
            input.as_deref(),
            format,
            quality,
            scale,
            out_dir,
            &font,
        ),

        Commands::Edit {
            input,
            template,
            palette,
            set,
            undo,
            output,
        } => cmd_edit(input.as_deref(), template, palette, set, undo, output.as_deref()),

        Commands::Templates => {
            for id in TemplateId::ALL {
                println!("{:<12} {:<14} {}", id.as_str(), id.name(), id.description());
            }
            Ok(())
        }

        Commands::Palettes => {
            for palette in PALETTES {
                println!(
                    "{:<14} {:<14} {} {}",
                    palette.id, palette.name, palette.primary, palette.secondary
                );
            }
            Ok(())
        }

        Commands::Styles { command } => cmd_styles(&settings, &cli.workdir, command),
    }
}

/// Read a style document, or the default style when no path is given
fn load_style(input: Option<&Path>) -> Result<StyleConfig> {
    let Some(path) = input else {
        debug!("No input given, using the default style");
        return Ok(StyleConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json_text(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write text to a file, or stdout when no path is given
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_render(
    settings: &CardforgeConfig,
    workdir: &Path,
    input: Option<&Path>,
    format: Option<String>,
    quality: Option<f32>,
    scale: Option<f32>,
    out_dir: Option<PathBuf>,
    fonts: &[PathBuf],
) -> Result<()> {
    let style = load_style(input)?;
    let format = match format {
        Some(name) => parse_image_format(&name)?,
        None => settings.export.image_format()?,
    };
    let quality = quality.unwrap_or(settings.export.quality);
    let rasterizer = Rasterizer::new(scale.unwrap_or(settings.export.scale));
    let out_dir = out_dir.unwrap_or_else(|| workdir.join(&settings.export.output_dir));

    let mut book = FontBook::discover();
    for path in fonts {
        book.load_font_file(path)
            .with_context(|| format!("Failed to load font {}", path.display()))?;
    }

    let mut canvas = PixmapCanvas::new(book);
    let file = rasterizer
        .export(&style, &compute(&style), &mut canvas, format, quality)
        .context("Image export failed")?;

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = file.write_to(&out_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_edit(
    input: Option<&Path>,
    template: Option<TemplateId>,
    palette: Option<String>,
    set: Vec<(String, String)>,
    undo: usize,
    output: Option<&Path>,
) -> Result<()> {
    let mut editor = EditorState::new(load_style(input)?);

    if let Some(id) = template {
        editor.dispatch(EditAction::ApplyTemplate(id))?;
    }
    if let Some(id) = palette {
        editor.dispatch(EditAction::ApplyPalette(id))?;
    }
    for (key, value) in set {
        editor
            .dispatch(EditAction::SetField { key: key.clone(), value })
            .with_context(|| format!("Cannot set '{}'", key))?;
    }
    for _ in 0..undo {
        if !editor.can_undo() {
            info!("Nothing left to undo");
            break;
        }
        editor.dispatch(EditAction::Undo)?;
    }

    emit(&to_json_text(editor.config())?, output)
}

fn cmd_styles(settings: &CardforgeConfig, workdir: &Path, command: StyleCommands) -> Result<()> {
    let dir = settings.store_dir(workdir);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut store = SavedStyleStore::load(FileStorage::new(&dir))
        .with_context(|| format!("Failed to open style store in {}", dir.display()))?;

    match command {
        StyleCommands::List => {
            if store.list().is_empty() {
                info!("No saved styles");
            }
            for style in store.list() {
                let local = style.timestamp.with_timezone(&chrono::Local);
                println!(
                    "{:<15} {:<24} {}",
                    style.id,
                    style.name,
                    local.format("%Y-%m-%d %H:%M")
                );
            }
        }
        StyleCommands::Save { name, input } => {
            let config = load_style(input.as_deref())?;
            let saved = store.save(&name, &config)?;
            info!("Saved '{}'", saved.name);
            println!("{}", saved.id);
        }
        StyleCommands::Show { id, output } => {
            let saved = store
                .get(id)
                .with_context(|| format!("No saved style with id {}", id))?;
            emit(&to_json_text(&saved.config)?, output.as_deref())?;
        }
        StyleCommands::Delete { id } => {
            let removed = store.delete(id)?;
            info!("Deleted '{}'", removed.name);
        }
    }
    Ok(())
}
