//! Command-line interface for zettel
//! Renders a zettel document (symbolic `.sz` or `.zjson`) to an HTML fragment on stdout.
//!
//! Usage:
//!   zettel `<path>` [--format `<sz|zjson|auto>`] [--heading-offset N] [--unique PREFIX]
//!          [--no-footnotes] [--suppress-links] [--config `<file>`]
//!   zettel --list-formats                                   - List the input formats

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zettel_config::{Loader, ZettelConfig};
use zettel_html::FormatRegistry;

fn main() {
    let matches = Command::new("zettel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render zettel documents to HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the zettel document")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Input format: sz, zjson, or auto (pick by extension)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("heading-offset")
                .long("heading-offset")
                .help("Added to every heading level")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("unique")
                .long("unique")
                .help("Prefix for generated ids"),
        )
        .arg(
            Arg::new("no-footnotes")
                .long("no-footnotes")
                .help("Drop footnotes and the endnote list")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("suppress-links")
                .long("suppress-links")
                .help("Render links as plain spans")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available input formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    let registry = FormatRegistry::with_defaults();
    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("Missing input path");
        std::process::exit(1);
    };
    handle_render_command(&registry, &config, path);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install logger: {}", e);
    }
}

/// Defaults, then the `--config` file, then the individual flags
fn load_config(matches: &ArgMatches) -> Result<ZettelConfig, zettel_config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("input.format", format.as_str())?;
    }
    if let Some(offset) = matches.get_one::<i64>("heading-offset") {
        loader = loader.set_override("render.heading_offset", *offset)?;
    }
    if let Some(prefix) = matches.get_one::<String>("unique") {
        loader = loader.set_override("render.unique_prefix", prefix.as_str())?;
    }
    if matches.get_flag("no-footnotes") {
        loader = loader.set_override("render.emit_footnotes", false)?;
    }
    if matches.get_flag("suppress-links") {
        loader = loader.set_override("render.suppress_links", true)?;
    }
    loader.build()
}

/// Handle the render command
fn handle_render_command(registry: &FormatRegistry, config: &ZettelConfig, path: &str) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        std::process::exit(1);
    });

    let format = match config.input.format.format_name() {
        Some(name) => registry.get(name),
        None => registry.for_path(Path::new(path)),
    };
    let format = format.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available formats: {}", registry.list_formats().join(", "));
        std::process::exit(1);
    });
    tracing::info!(path, format = format.name(), "rendering document");

    match format.render(&source, &config.render) {
        Ok(html) => println!("{}", html),
        Err(e) => {
            eprintln!("Render error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available input formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", format.description());
            println!("    extensions: {}", format.file_extensions().join(", "));
            println!();
        }
    }
}
