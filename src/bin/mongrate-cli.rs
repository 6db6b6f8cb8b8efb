//! mongrate command line - translate SQL statements against a schema
//! description
//!
//! Reads a schema description (JSON `SchemaSpec`) and translates SQL
//! statements from the arguments or from stdin into mongosh commands.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::Context;

use mongrate::{translate_sql, SchemaContext};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--help" | "-h") | None => {
            print_help();
            Ok(())
        }
        Some("--version" | "-v") => {
            println!("mongrate v{VERSION}");
            Ok(())
        }
        Some(schema_path) => {
            let schema = load_schema(schema_path)?;
            match args.get(1) {
                Some(sql) => {
                    println!("{}", translate_sql(&schema, sql)?);
                    Ok(())
                }
                None => interactive(&schema),
            }
        }
    }
}

fn load_schema(path: &str) -> anyhow::Result<SchemaContext> {
    let text = fs::read_to_string(path).with_context(|| format!("reading schema {path}"))?;
    SchemaContext::from_json(&text).with_context(|| format!("parsing schema {path}"))
}

/// Translate one statement per line until EOF. Errors are reported and the
/// loop keeps going.
fn interactive(schema: &SchemaContext) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("sql> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let sql = line.trim();

        if !sql.is_empty() {
            match translate_sql(schema, sql) {
                Ok(command) => println!("{command}"),
                Err(e) => eprintln!("error: {e}"),
            }
        }

        print!("sql> ");
        stdout.flush()?;
    }

    println!();
    Ok(())
}

fn print_help() {
    println!(
        r#"mongrate v{VERSION} - SQL to MongoDB translator

Usage:
  mongrate-cli <schema.json>            interactive translation from stdin
  mongrate-cli <schema.json> "<sql>"    translate a single statement
  mongrate-cli --version                print the version
  mongrate-cli --help                   print this help

The schema description is a JSON object with "tables" (name, columns,
primary_key) and optional "references", "checks" and "uniques"."#
    );
}
