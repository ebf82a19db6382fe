//! `canopy` CLI: convert and inspect JSON, YAML and BSON value trees.
//!
//! ## Usage
//!
//! ```sh
//! # Convert YAML to pretty JSON (formats from the file extensions)
//! canopy convert -i config.yaml -o config.json --pretty
//!
//! # Convert stdin to stdout (formats must be named)
//! echo '{"name":"Alice","age":30}' | canopy convert --from json --to yaml
//!
//! # Drop null entries while converting to BSON
//! canopy convert -i save.json -o save.bson --trim
//!
//! # Print every node with its kind, width and flags
//! canopy inspect -i save.bson
//! ```

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use canopy_core::{FormatKind, Node, Value};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "canopy",
    version,
    about = "Convert and inspect JSON, YAML and BSON value trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a tree in one format and save it in another
    Convert {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Input format: json, yaml or bson (defaults to the input extension)
        #[arg(long)]
        from: Option<String>,
        /// Output format: json, yaml or bson (defaults to the output extension)
        #[arg(long)]
        to: Option<String>,
        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
        /// Remove null entries before saving
        #[arg(long)]
        trim: bool,
    },
    /// Print every node with its path, kind and numeric flags
    Inspect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Input format: json, yaml or bson (defaults to the input extension)
        #[arg(long)]
        from: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
            pretty,
            trim,
        } => {
            let from = resolve_format(from.as_deref(), input.as_deref(), "--from")?;
            let to = resolve_format(to.as_deref(), output.as_deref(), "--to")?;

            let mut tree = load(from, input.as_deref())?;
            if trim {
                tree.trim();
            }
            let bytes = to
                .adapter(pretty)
                .save_bytes(&tree)
                .with_context(|| format!("Failed to save tree as {to}"))?;
            write_output(output.as_deref(), &bytes)?;
        }
        Commands::Inspect { input, from } => {
            let from = resolve_format(from.as_deref(), input.as_deref(), "--from")?;
            let tree = load(from, input.as_deref())?;
            let mut lines = Vec::new();
            describe(&tree, "$", &mut lines);
            let mut report = lines.join("\n");
            report.push('\n');
            write_output(None, report.as_bytes())?;
        }
    }

    Ok(())
}

/// Pick a format from an explicit name, else from the file extension.
fn resolve_format(name: Option<&str>, path: Option<&str>, flag: &str) -> Result<FormatKind> {
    if let Some(name) = name {
        return name
            .parse::<FormatKind>()
            .with_context(|| format!("Invalid value for {flag}"));
    }
    match path {
        Some(path) => FormatKind::from_path(Path::new(path)).with_context(|| {
            format!("Cannot infer the format of '{path}' from its extension; pass {flag}")
        }),
        None => bail!("{flag} is required when using standard streams"),
    }
}

fn load(format: FormatKind, path: Option<&str>) -> Result<Node> {
    let content = read_input(path)?;
    if content.is_empty() {
        return Ok(Node::new());
    }
    format
        .adapter(false)
        .load_bytes(&content)
        .with_context(|| format!("Failed to load {format} input"))
}

/// One line per node: path, kind and the node's size, width or flags.
fn describe(node: &Node, path: &str, lines: &mut Vec<String>) {
    let detail = match node.value() {
        Value::Null => String::new(),
        Value::String(s) => format!("width={}", s.len()),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => {
            let mut detail = format!("width={} value={n}", n.width());
            if n.has_decimal() {
                detail.push_str(" decimal");
            }
            if n.is_negative() {
                detail.push_str(" negative");
            }
            detail
        }
        Value::Array(items) => format!("size={}", items.len()),
        Value::Mapping(map) => format!("size={}", map.len()),
    };
    lines.push(format!("{path}\t{}\t{detail}", node.kind()).trim_end().to_owned());

    match node.value() {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                describe(item, &format!("{path}[{i}]"), lines);
            }
        }
        Value::Mapping(_) => {
            for (key, child) in node.entries() {
                describe(child, &format!("{path}.{key}"), lines);
            }
        }
        _ => {}
    }
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {path}")),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
