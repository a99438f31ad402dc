use crate::inventory::flatten::Inventory;
use crate::inventory::rows::{InventoryRow, TableKind};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Rendering used for an inventory table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display
    #[default]
    Table,
    /// Delimited text with an optional header row
    Csv,
    /// One JSON object per row
    Jsonl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Output settings shared by all tables of a run
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub format: OutputFormat,

    /// Field delimiter for CSV output
    pub delimiter: char,

    /// Whether CSV output starts with a header row
    pub header: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            format: OutputFormat::default(),
            delimiter: ',',
            header: true,
        }
    }
}

/// Writes inventory tables to a single output
pub struct TableWriter<W: Write> {
    writer: W,
    config: WriterConfig,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, config: WriterConfig) -> Self {
        TableWriter { writer, config }
    }

    /// Write one inventory table from `inventory`
    pub fn write_table(&mut self, inventory: &Inventory, table: TableKind) -> Result<()> {
        match table {
            TableKind::Pipelines => self.write_rows(&inventory.pipelines),
            TableKind::Activities => self.write_rows(&inventory.activities),
            TableKind::LinkedServices => self.write_rows(&inventory.linked_services),
            TableKind::Datasets => self.write_rows(&inventory.datasets),
            TableKind::Triggers => self.write_rows(&inventory.triggers),
        }
    }

    pub fn write_rows<R: InventoryRow>(&mut self, rows: &[R]) -> Result<()> {
        let written = match self.config.format {
            OutputFormat::Table => self.write_text_table(rows),
            OutputFormat::Csv => self.write_csv(rows),
            OutputFormat::Jsonl => self.write_jsonl(rows),
        };
        written.with_context(|| format!("Failed to write {} table", R::TABLE.title()))
    }

    /// A blank line and a title ahead of a table in multi-table output
    pub fn write_heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.writer, "\n{}", title).context("Failed to write heading")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_csv<R: InventoryRow>(&mut self, rows: &[R]) -> Result<()> {
        let delimiter = self.config.delimiter;

        if self.config.header {
            let header: Vec<String> = R::COLUMNS
                .iter()
                .map(|column| csv_field(column, delimiter))
                .collect();
            writeln!(self.writer, "{}", header.join(&delimiter.to_string()))?;
        }

        for row in rows {
            let fields: Vec<String> = row
                .cells()
                .into_iter()
                .map(|cell| cell.map(|c| csv_field(c, delimiter)).unwrap_or_default())
                .collect();
            writeln!(self.writer, "{}", fields.join(&delimiter.to_string()))?;
        }
        Ok(())
    }

    fn write_jsonl<R: InventoryRow>(&mut self, rows: &[R]) -> Result<()> {
        for row in rows {
            let json = serde_json::to_string(row).context("Failed to serialize row")?;
            writeln!(self.writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_text_table<R: InventoryRow>(&mut self, rows: &[R]) -> Result<()> {
        let cells: Vec<Vec<Cow<str>>> = rows
            .iter()
            .map(|row| {
                row.cells()
                    .into_iter()
                    .map(|c| c.map(escape_line_breaks).unwrap_or(Cow::Borrowed("null")))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = R::COLUMNS.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+";

        writeln!(self.writer, "{}", border)?;
        write_text_line(&mut self.writer, R::COLUMNS, &widths)?;
        writeln!(self.writer, "{}", border)?;
        for row in &cells {
            let row: Vec<&str> = row.iter().map(|c| c.as_ref()).collect();
            write_text_line(&mut self.writer, &row, &widths)?;
        }
        writeln!(self.writer, "{}", border)?;
        Ok(())
    }
}

fn write_text_line<W: Write>(writer: &mut W, cells: &[&str], widths: &[usize]) -> std::io::Result<()> {
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width - cell.chars().count();
        write!(writer, "| {}{} ", cell, " ".repeat(padding))?;
    }
    writeln!(writer, "|")
}

/// Keep a text-table cell on one line
fn escape_line_breaks(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r']) {
        Cow::Owned(value.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Parse a CSV delimiter, rejecting characters that CSV reserves
pub fn parse_delimiter(value: &str) -> std::result::Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('"' | '\n' | '\r'), None) => {
            Err(format!("{:?} cannot be used as a CSV delimiter", value))
        }
        (Some(delimiter), None) => Ok(delimiter),
        _ => Err(format!("delimiter must be a single character, got {:?}", value)),
    }
}

/// Quote a CSV field when it holds the delimiter, a quote or a line break
fn csv_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains(['"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes each inventory table to its own file in a directory
pub struct InventoryWriter {
    output_dir: PathBuf,
    config: WriterConfig,
}

impl InventoryWriter {
    /// Create the output directory if needed
    pub fn new<P: AsRef<Path>>(output_dir: P, config: WriterConfig) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        Ok(InventoryWriter { output_dir, config })
    }

    pub fn path_for(&self, table: TableKind) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", table.file_stem(), self.config.format.extension()))
    }

    /// Write the requested tables, replacing existing files. Returns the paths written.
    pub fn write_inventory(&self, inventory: &Inventory, tables: &[TableKind]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(tables.len());

        for &table in tables {
            let path = self.path_for(table);
            let file = File::create(&path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;

            let mut writer = TableWriter::new(BufWriter::new(file), self.config.clone());
            writer.write_table(inventory, table)?;
            writer.flush()?;

            tracing::info!(
                table = table.title(),
                rows = inventory.row_count(table),
                path = %path.display(),
                "wrote inventory table"
            );
            written.push(path);
        }

        Ok(written)
    }
}
