//! CLI tool to run pattern (.pat) files against delimited input data.
//!
//! Usage:
//!   pat-run <pattern.pat> <input.csv>
//!   pat-run <pattern.pat> <input.csv> -o <output.txt>
//!
//! If no output file is specified, writes to stdout. Method-call tokens
//! (`$name(...)`) are rejected: this host has no script engine.

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tablepat::{NoScripting, Table, TableFormat};

#[derive(Parser)]
#[command(name = "pat-run", version, about = "Run a pattern file against delimited input data")]
struct Args {
    /// Pattern definition file (.pat); empty file copies the input
    pattern: PathBuf,

    /// Input data file (delimited rows)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter
    #[arg(short = 'd', long, default_value_t = ',')]
    delimiter: char,

    /// Honor CSV-style quoted fields
    #[arg(short, long)]
    quoted: bool,

    /// Row filter regex; input rows that do not match are skipped
    #[arg(short, long, default_value = ".*")]
    filter: String,
}

fn main() {
    let args = Args::parse();

    let pattern_text = match fs::read_to_string(&args.pattern) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading pattern file '{}': {}", args.pattern.display(), e);
            process::exit(1);
        }
    };

    let input_text = match fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let format = TableFormat {
        field_delimiter: args.delimiter,
        quoted_fields: args.quoted,
    };

    let table = match Table::new(&input_text, &format, &args.filter) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Input error: {}", e);
            process::exit(1);
        }
    };

    let output = match tablepat::process(&table, &pattern_text, "", &NoScripting) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Pattern error: {}", e);
            process::exit(1);
        }
    };

    if let Some(out_path) = &args.output {
        if let Some(parent) = out_path.parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating output directory for '{}'", out_path.display());
            process::exit(1);
        }
        if let Err(e) = fs::write(out_path, &output) {
            eprintln!("Error writing output file '{}': {}", out_path.display(), e);
            process::exit(1);
        }
        eprintln!(
            "Processed {} rows, output: {}",
            table.num_rows(),
            out_path.display()
        );
    } else {
        if let Err(e) = io::stdout().write_all(output.as_bytes()) {
            eprintln!("Error writing output: {}", e);
            process::exit(1);
        }
        if !output.is_empty() && !output.ends_with('\n') {
            println!();
        }
        eprintln!("Processed {} rows", table.num_rows());
    }
}
