// ABOUTME: Main entry point for the deckgen program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PPTX presentation from an outline
    Generate(GenerateArgs),

    /// Repair raw generator output into a strict outline JSON file
    Sanitize(SanitizeArgs),

    /// List the available themes
    Themes,

    /// List the available presentation templates
    Templates(TemplatesArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the outline file (strict JSON or raw generator output)
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output PPTX file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Theme to apply: modern, tech or nature
    #[arg(short, long)]
    theme: Option<String>,

    /// Aspect ratio: "16:9" or "4:3"
    #[arg(long)]
    aspect_ratio: Option<String>,

    /// Name of a presentation template from the templates directory
    #[arg(long)]
    template: Option<String>,

    /// Directory holding presentation templates
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Place slide images in a full-width band above the points
    #[arg(long)]
    top_band: bool,

    /// Fetch image bytes and embed them instead of linking URLs
    #[arg(long)]
    fetch_images: bool,

    /// Print the result as a base64 data URI instead of writing a file
    #[arg(long)]
    data_uri: bool,
}

#[derive(Args)]
struct SanitizeArgs {
    /// Path to the raw generator output
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output outline JSON file; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct TemplatesArgs {
    /// Directory holding presentation templates
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Sanitize(args)) => run_sanitize(args),
        Some(Commands::Themes) => {
            for id in deckgen::Theme::options() {
                let theme = deckgen::Theme::resolve(id);
                println!(
                    "{:8} primary=#{} secondary=#{} accent=#{}",
                    theme.id, theme.primary, theme.secondary, theme.accent
                );
            }
            Ok(())
        }
        Some(Commands::Templates(args)) => run_templates(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            // Surface the raw generator text on sanitizer failures so the
            // caller can see what the generator actually produced.
            if let Some(raw) = e.raw_text() {
                eprintln!("--- raw generator output ---");
                eprintln!("{}", raw);
            }
            std::process::exit(1);
        }
    }
}

fn run_generate(args: &GenerateArgs) -> deckgen::Result<()> {
    println!("Executing generate command...");
    let config = deckgen::Config::from_env();

    deckgen::utils::validate_file_exists(&args.input)?;
    let raw = fs::read_to_string(&args.input)?;

    // Sanitizing strict JSON is a no-op, so every input goes through it.
    let outline = deckgen::sanitize(&raw)?;

    let templates_dir = args
        .templates_dir
        .clone()
        .unwrap_or_else(|| config.templates_dir.clone());
    if let Some(template) = &args.template {
        deckgen::config::validate_template(template, &templates_dir)?;
    }

    let options = deckgen::DeckOptions {
        theme: args
            .theme
            .clone()
            .unwrap_or_else(|| config.default_theme.clone()),
        layout: config.get_layout_options(args.top_band),
        package: config.get_package_config(
            Some(outline.title.clone()),
            args.aspect_ratio.clone(),
            args.template.clone(),
        ),
        fetch_images: args.fetch_images,
        fetch_timeout_ms: config.fetch_timeout_ms,
    };

    if args.output.is_none() && !args.data_uri {
        return Err(deckgen::DeckError::ValidationError(
            "Specify --output and/or --data-uri".to_string(),
        ));
    }

    let bytes = deckgen::build_deck(&outline, &options)?;

    if args.data_uri {
        println!("{}", deckgen::data_uri(&bytes));
    }

    if let Some(output) = &args.output {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                deckgen::utils::validate_directory_writable(parent)?;
            }
        }
        fs::write(output, &bytes)?;
        println!("PPTX generated successfully: {:?}", output);
    }

    Ok(())
}

fn run_sanitize(args: &SanitizeArgs) -> deckgen::Result<()> {
    println!("Executing sanitize command...");

    deckgen::utils::validate_file_exists(&args.input)?;
    let raw = fs::read_to_string(&args.input)?;
    let outline = deckgen::sanitize(&raw)?;
    let json = serde_json::to_string_pretty(&outline)?;

    match &args.output {
        Some(output) => {
            deckgen::utils::ensure_parent_directory_exists(output)?;
            fs::write(output, json)?;
            println!("Outline written to {:?}", output);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_templates(args: &TemplatesArgs) -> deckgen::Result<()> {
    let config = deckgen::Config::from_env();
    // A missing default directory just lists nothing, but a directory the
    // user named explicitly has to exist.
    let dir = match &args.dir {
        Some(dir) => {
            deckgen::utils::validate_directory_exists(dir)?;
            dir.clone()
        }
        None => config.templates_dir,
    };

    let templates = deckgen::list_templates(&dir)?;
    if templates.is_empty() {
        println!("No templates found in {:?}", dir);
    } else {
        for name in templates {
            println!("{}", name);
        }
    }

    Ok(())
}
