//! md2rst: CLI tool to convert Markdown files to reStructuredText

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use md2rst_core::{
    ConvertOptions, DEFAULT_INDENT_WIDTH, LogTrace, convert_with_options, convert_with_trace,
};

use config::{CONFIG_FILE_NAME, Config};

#[derive(Parser, Debug)]
#[command(name = "md2rst")]
#[command(about = "Convert Markdown to reStructuredText")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Examples:
  md2rst README.md                  # Print README.md converted to RST
  md2rst README.md -o README.rst    # Convert to specific output file
  cat README.md | md2rst            # Convert standard input
  md2rst docs/ -o rst/ -r           # Convert directory recursively
  md2rst init                       # Write a sample _md2rst.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample configuration file
    Init {
        /// Path of the configuration file to write
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema of the configuration file instead
        #[arg(long)]
        schema: bool,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input Markdown file or directory (standard input if omitted or "-")
    input: Option<PathBuf>,

    /// Output file or directory (standard output if omitted for a single input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to _md2rst.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of spaces that count as one indentation level
    #[arg(long)]
    indent_width: Option<usize>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Verbose output, including a trace of every converted line
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

/// Settings resolved from command line, config file and defaults
#[derive(Debug, Clone)]
struct Settings {
    options: ConvertOptions,
    extension: String,
}

impl Settings {
    fn resolve(args: &ConvertArgs, config: &Config) -> Result<Self> {
        let indent_width = args
            .indent_width
            .or(config.convert.indent_width)
            .unwrap_or(DEFAULT_INDENT_WIDTH);
        let options =
            ConvertOptions::with_indent_width(indent_width).context("Invalid configuration")?;

        Ok(Self {
            options,
            extension: config.extension().to_string(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Init { output, schema }) => init_config(&output, schema),
        None => run(&cli.convert),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: &ConvertArgs) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    let config = load_config(args.config.as_deref())?;
    let settings = Settings::resolve(args, &config)?;
    log::debug!("Settings: {:?}", settings);

    match args.input.as_deref() {
        None => convert_stdin(args.output.as_deref(), &settings),
        Some(input) if input == Path::new("-") => convert_stdin(args.output.as_deref(), &settings),
        Some(input) if input.is_file() => {
            convert_file(input, args.output.as_deref(), &settings, args.quiet)
        }
        Some(input) if input.is_dir() => convert_directory(
            input,
            args.output.as_deref(),
            args.recursive,
            args.jobs,
            args.quiet,
            &settings,
        ),
        Some(input) => anyhow::bail!("Input path does not exist: {}", input.display()),
    }
}

/// Load the explicit config file, or `_md2rst.toml` from the current directory
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config = Config::load_from_dir(&cwd)?;
    if config.is_some() {
        log::info!("Using {}", cwd.join(CONFIG_FILE_NAME).display());
    }
    Ok(config.unwrap_or_default())
}

/// Write a sample configuration file, or print the schema
fn init_config(output: &Path, schema: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    let content = Config::sample().to_toml_with_schema()?;
    write_output(Some(output), &content)?;
    println!("{}", output.display());

    Ok(())
}

/// Convert text, tracing every line when debug logging is enabled
fn convert_text(text: &str, settings: &Settings) -> String {
    if log::log_enabled!(target: "md2rst::convert", log::Level::Debug) {
        convert_with_trace(text, &settings.options, &LogTrace)
    } else {
        convert_with_options(text, &settings.options)
    }
}

/// Convert standard input
fn convert_stdin(output: Option<&Path>, settings: &Settings) -> Result<()> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read standard input")?;

    let rst = convert_text(&content, settings);
    write_output(output, &rst)
}

/// Convert a single Markdown file
fn convert_file(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
    quiet: bool,
) -> Result<()> {
    match output {
        Some(path) => log::info!("Converting: {} -> {}", input.display(), path.display()),
        None => log::info!("Converting: {}", input.display()),
    }

    convert_file_inner(input, output, settings)?;

    if let Some(path) = output {
        if !quiet {
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Convert a directory of Markdown files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    jobs: Option<usize>,
    quiet: bool,
    settings: &Settings,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_markdown_files(input, recursive)?;

    if files.is_empty() {
        if !quiet {
            eprintln!("No Markdown files found in {}", input.display());
        }
        return Ok(());
    }

    log::info!("Found {} Markdown files", files.len());

    // Configure thread pool if jobs specified
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir.join(relative).with_extension(&settings.extension);

            match convert_file_inner(file, Some(&output_file), settings) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !quiet {
                        println!("{}", output_file.display());
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    for (file, e) in &errors {
        log::error!("Error converting {}: {:#}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

/// Inner conversion function that doesn't print (for parallel use)
fn convert_file_inner(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let rst = convert_text(&content, settings);
    write_output(output, &rst)
}

/// Write to a file (creating parent directories) or to standard output
fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = output else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .context("Failed to write to standard output")?;
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(path, content).with_context(|| format!("Failed to write: {}", path.display()))
}

/// Collect all Markdown files in a directory
fn collect_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if is_markdown(&path) {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_markdown_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
    })
}
