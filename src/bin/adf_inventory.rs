//! adf-inventory: Flatten an Azure Data Factory ARM template into inventories
//!
//! Usage:
//!   # Display every inventory as a text table
//!   adf-inventory arm_template.json
//!
//!   # Read from stdin, show only activities as CSV
//!   cat arm_template.json | adf-inventory --format csv --table activities
//!
//!   # Write ADF_Pipelines.csv, ADF_Activities.csv, ... to a directory
//!   adf-inventory arm_template.json --format csv --output-dir ./inventory
//!
//!   # List the resource types present in the template
//!   adf-inventory --list-types arm_template.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use adf_inventory::inventory::parse_delimiter;
use adf_inventory::template::{self, type_census};
use adf_inventory::{
    FlattenConfig, Flattener, InventoryWriter, NamePolicy, OutputFormat, TableKind, TableWriter,
    WriterConfig,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "adf-inventory", version)]
#[command(about = "Flatten an Azure Data Factory ARM template into tabular inventories", long_about = None)]
struct Args {
    /// ARM template file (use stdin if omitted or "-")
    #[arg(value_name = "TEMPLATE")]
    input: Option<PathBuf>,

    /// Write one file per inventory into this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Inventories to emit (repeatable; all when omitted)
    #[arg(short, long = "table", value_enum)]
    tables: Vec<TableKind>,

    /// CSV field delimiter
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: char,

    /// Omit the CSV header row
    #[arg(long)]
    no_header: bool,

    /// Fail on resource names that are not ARM name expressions
    #[arg(long)]
    strict_names: bool,

    /// Print the resource types found in the template and exit
    #[arg(long)]
    list_types: bool,

    /// Log level for diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match level.to_tracing_level() {
        Some(level) => EnvFilter::new(level.as_str().to_lowercase()),
        None => EnvFilter::new("off"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let template = read_template(args.input.as_ref())?;

    if args.list_types {
        return print_type_census(&template);
    }

    let config = FlattenConfig {
        name_policy: if args.strict_names {
            NamePolicy::Strict
        } else {
            NamePolicy::PassThrough
        },
        ..Default::default()
    };
    let inventory = Flattener::new(config).flatten(&template)?;

    let tables = if args.tables.is_empty() {
        TableKind::ALL.to_vec()
    } else {
        let mut tables = args.tables.clone();
        tables.sort();
        tables.dedup();
        tables
    };

    let writer_config = WriterConfig {
        format: args.format,
        delimiter: args.delimiter,
        header: !args.no_header,
    };

    if let Some(output_dir) = &args.output_dir {
        let writer = InventoryWriter::new(output_dir, writer_config)?;
        for path in writer.write_inventory(&inventory, &tables)? {
            eprintln!("✓ {}", path.display());
        }
        return Ok(());
    }

    let stdout = std::io::stdout();
    let show_titles = args.format == OutputFormat::Table;
    let mut writer = TableWriter::new(stdout.lock(), writer_config);

    for table in tables {
        if show_titles {
            let title = format!("{} ({} rows)", table.title(), inventory.row_count(table));
            writer.write_heading(&title)?;
        }
        writer.write_table(&inventory, table)?;
    }
    writer.flush()?;

    Ok(())
}

/// Load the template from a file, or from stdin when no path (or "-") is given
fn read_template(input: Option<&PathBuf>) -> Result<Value> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(template::load_template(path)?),
        _ => {
            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("Failed to read template from stdin")?;
            Ok(template::parse_template(&mut content, "<stdin>")?)
        }
    }
}

fn print_type_census(template: &Value) -> Result<()> {
    let resources = template::resources(template)?;
    let mut stdout = std::io::stdout().lock();

    for (type_name, count) in type_census(resources) {
        writeln!(stdout, "{}\t{}", count, type_name)?;
    }
    Ok(())
}
