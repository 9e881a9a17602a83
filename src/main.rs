//! Serpent Deck CLI
//!
//! Write solver input decks and inspect fission-matrix reports.
//!
//! Usage:
//!     serpent-deck write --model core.json --output core.i
//!     serpent-deck read core.i_res.m --name fmtx_t
//!     serpent-deck bc --bc cuboid-legacy

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use serpent_deck::adapters::deck::DeckWriter;
use serpent_deck::adapters::report::{FissionMatrix, FissionMatrixReader, DEFAULT_MATRIX_NAME};
use serpent_deck::core::{BcTable, CuboidLegacy, Deck, MapLegacy, PerAxis};

/// Serpent Deck - reactor model to solver input and back
#[derive(Parser)]
#[command(name = "serpent-deck")]
#[command(version)]
#[command(about = "Write Serpent input decks and read fission-matrix reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an input deck from a JSON model
    Write {
        /// Deck description (JSON)
        #[arg(short, long)]
        model: String,

        /// Output deck path; stdout when absent
        #[arg(short, long)]
        output: Option<String>,

        /// Boundary condition encoding
        #[arg(long, value_enum, default_value_t = BcChoice::PerAxis)]
        bc: BcChoice,
    },

    /// Read a fission matrix from a result report
    Read {
        /// Result report path
        report: String,

        /// Matrix name in the report
        #[arg(short, long, default_value = DEFAULT_MATRIX_NAME)]
        name: String,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Print a boundary condition encoding table
    Bc {
        #[arg(long, value_enum, default_value_t = BcChoice::PerAxis)]
        bc: BcChoice,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BcChoice {
    PerAxis,
    CuboidLegacy,
    MapLegacy,
}

impl BcChoice {
    fn writer(self) -> DeckWriter {
        match self {
            BcChoice::PerAxis => DeckWriter::new().with_bc_encoding(PerAxis),
            BcChoice::CuboidLegacy => DeckWriter::new().with_bc_encoding(CuboidLegacy),
            BcChoice::MapLegacy => DeckWriter::new().with_bc_encoding(MapLegacy),
        }
    }

    fn table(self) -> BcTable {
        match self {
            BcChoice::PerAxis => BcTable::from_encoding(&PerAxis),
            BcChoice::CuboidLegacy => BcTable::from_encoding(&CuboidLegacy),
            BcChoice::MapLegacy => BcTable::from_encoding(&MapLegacy),
        }
    }
}

fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn cmd_write(model: &str, output: Option<&str>, bc: BcChoice) -> Result<()> {
    let model_path = expand_path(model);
    let json = fs::read_to_string(&model_path)
        .with_context(|| format!("reading model {}", model_path.display()))?;
    let deck = Deck::from_json(&json)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    let writer = bc.writer();
    match output {
        Some(path) => {
            let path = expand_path(path);
            writer
                .write(&path, &deck)
                .with_context(|| format!("writing deck {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            writer.write_to(&mut sink, &deck)?;
            sink.flush()?;
        }
    }
    info!(title = %deck.title, bc = writer.bc_encoding_name(), "done");
    Ok(())
}

fn cmd_read(report: &str, name: &str, json: bool) -> Result<()> {
    let path = expand_path(report);
    if !FissionMatrixReader::probe(&path)? {
        anyhow::bail!("{} contains no fission matrix output", path.display());
    }

    let fm = FissionMatrixReader::new()
        .with_matrix_name(name)
        .read(&path)
        .with_context(|| format!("reading {} from {}", name, path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fm)?);
    } else {
        print_matrix(name, &fm);
    }
    Ok(())
}

fn print_matrix(name: &str, fm: &FissionMatrix) {
    println!("{}: order {}", name, fm.order());
    println!();
    println!("Values:");
    print_rows(fm.values().row_iter().map(|r| r.iter().copied().collect()));
    println!();
    println!("Relative errors:");
    print_rows(fm.uncertainties().row_iter().map(|r| r.iter().copied().collect()));
}

fn print_rows(rows: impl Iterator<Item = Vec<f64>>) {
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>12.5e}", v)).collect();
        println!("  {}", cells.join(" "));
    }
}

fn cmd_bc(bc: BcChoice) {
    let table = bc.table();
    println!("{:<12} {:<12} tokens", "radial", "axial");
    for (radial, axial, tokens) in table.iter() {
        println!("{:<12} {:<12} {}", radial, axial, tokens);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Write { model, output, bc } => cmd_write(&model, output.as_deref(), bc),
        Commands::Read { report, name, json } => cmd_read(&report, &name, json),
        Commands::Bc { bc } => {
            cmd_bc(bc);
            Ok(())
        }
    }
}
