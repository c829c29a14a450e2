//! sshape - Structured Shape CLI tool
//!
//! A command line tool for diffing, pruning and querying YAML/JSON files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use structured_shape::merge::{apply_patch, diff};
use structured_shape::prune::prune;
use structured_shape::schema::{ResolveOptions, Schema};
use structured_shape::value::{self, Map, Value};
use structured_shape::{get_by_path, set_by_path};

#[derive(Debug, Parser)]
#[command(name = "sshape", version, about = "Structural diff, shape pruning and schema path lookup")]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the minimal patch turning BASE into UPDATED
    Diff {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        updated: PathBuf,
    },

    /// Apply a patch produced by `diff`
    Apply {
        #[arg(long)]
        base: PathBuf,
        #[arg(long)]
        patch: PathBuf,
    },

    /// Keep only the fields of SOURCE that SHAPE asks for
    Prune {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        shape: PathBuf,
    },

    /// Print the value at a dot path
    Get { file: PathBuf, path: String },

    /// Set the value at a dot path and print the whole document
    Set {
        file: PathBuf,
        path: String,
        /// YAML/JSON value to write
        value: String,
    },

    /// Print the sub-schema addressed by a dot path
    Resolve {
        #[arg(short, long)]
        schema: PathBuf,
        /// Name of the type in the schema to start from
        #[arg(short, long)]
        type_name: String,
        /// Union fallback alternative; negative leaves ambiguous unions unresolved
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        prefer_option: i64,
        #[arg(default_value = "")]
        path: String,
    },

    /// List all types in a schema
    ListTypes {
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "structured_shape=debug,sshape=debug"
    } else {
        "structured_shape=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = cli.format;

    // The output is only created once the command has succeeded.
    let rendered = match cli.command {
        Command::Diff { base, updated } => {
            let patch = diff(&read_map(&base)?, &read_map(&updated)?);
            debug!(keys = patch.len(), "computed patch");
            render(&Value::Map(patch), format)?
        }
        Command::Apply { base, patch } => {
            let merged = apply_patch(&read_map(&base)?, &read_map(&patch)?);
            render(&Value::Map(merged), format)?
        }
        Command::Prune { source, shape } => {
            let pruned = prune(&read_value(&source)?, &read_value(&shape)?);
            render(&pruned, format)?
        }
        Command::Get { file, path } => {
            let doc = read_value(&file)?;
            let found = get_by_path(&doc, &path).ok_or_else(|| format!("No value at path '{}'", path))?;
            render(found, format)?
        }
        Command::Set { file, path, value: raw } => {
            let mut doc = read_value(&file)?;
            let value = value::from_yaml(&raw).map_err(|e| format!("Failed to parse value: {}", e))?;
            let updated = set_by_path(&mut doc, &path, value)?;
            render(updated, format)?
        }
        Command::Resolve {
            schema,
            type_name,
            prefer_option,
            path,
        } => {
            let schema = read_schema(&schema)?;
            if schema.find_named_type(&type_name).is_none() {
                return Err(format!("Type '{}' not found in schema", type_name).into());
            }
            let opts = ResolveOptions::from_signed(prefer_option);
            let node = schema
                .type_at_path(&type_name, &path, &opts)
                .ok_or_else(|| format!("No schema at path '{}' in type '{}'", path, type_name))?;
            match format {
                Format::Json => format!("{}\n", serde_json::to_string_pretty(node)?),
                Format::Yaml => serde_yaml::to_string(node)?,
            }
        }
        Command::ListTypes { schema } => {
            let schema = read_schema(&schema)?;
            let mut listing = String::from("Types in schema:\n");
            for name in schema.type_names() {
                listing.push_str(&format!("  - {}\n", name));
            }
            listing
        }
    };

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };
    output.write_all(rendered.as_bytes())?;
    output.flush()?;

    Ok(())
}

fn read_value(file: &FsPath) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file).map_err(|e| format!("Failed to read file {:?}: {}", file, e))?;
    let doc = value::from_yaml(&content).map_err(|e| format!("Failed to parse file {:?}: {}", file, e))?;
    Ok(doc)
}

fn read_map(file: &FsPath) -> Result<Map, Box<dyn std::error::Error>> {
    read_value(file)?
        .into_map()
        .ok_or_else(|| format!("File {:?} does not contain a map", file).into())
}

fn read_schema(file: &FsPath) -> Result<Schema, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file).map_err(|e| format!("Failed to read schema file {:?}: {}", file, e))?;
    let schema = Schema::from_yaml(&content).map_err(|e| format!("Failed to parse schema: {}", e))?;
    Ok(schema)
}

fn render(doc: &Value, format: Format) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        Format::Json => format!("{}\n", value::to_json_pretty(doc)?),
        Format::Yaml => value::to_yaml(doc)?,
    })
}
