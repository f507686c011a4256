use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use formats::{
    CellSummary, H3Grid, OccurrenceCell, RawRow, aggregate_occurrences, aggregate_values,
    parse_delimited,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline hex-cell aggregation of ocean point exports")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize one numeric field per H3 cell
    Aggregate {
        /// Input CSV with latitude/longitude columns
        #[arg(long)]
        input: PathBuf,

        /// Column to summarize (e.g. chlor_a, analysed_sst)
        #[arg(long)]
        field: String,

        /// H3 resolution
        #[arg(long, default_value_t = 5)]
        resolution: u8,

        /// Output CSV (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Count occurrences per species and H3 cell
    Occurrences {
        /// Input CSV with species and latitude/longitude columns
        #[arg(long)]
        input: PathBuf,

        /// H3 resolution
        #[arg(long, default_value_t = 5)]
        resolution: u8,

        /// Output CSV (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let grid = H3Grid::new();

    match args.command {
        Command::Aggregate {
            input,
            field,
            resolution,
            output,
        } => {
            let rows = read_rows(&input)?;
            let cells = aggregate_values(&rows, &field, &grid, resolution);
            info!("{} row(s) -> {} cell(s)", rows.len(), cells.len());
            write_summaries(open_output(output.as_deref())?, &field, &cells)?;
        }
        Command::Occurrences {
            input,
            resolution,
            output,
        } => {
            let rows = read_rows(&input)?;
            let cells = aggregate_occurrences(&rows, &grid, resolution);
            info!("{} row(s) -> {} species cell(s)", rows.len(), cells.len());
            write_occurrences(open_output(output.as_deref())?, &cells)?;
        }
    }

    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<RawRow>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    Ok(parse_delimited(&text)?)
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Ok(Box::new(fs::File::create(p)?))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn write_summaries(out: impl Write, field: &str, cells: &[CellSummary]) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record([
        "h3".to_string(),
        format!("{field}_mean"),
        format!("{field}_min"),
        format!("{field}_max"),
        format!("{field}_std"),
        "n".to_string(),
        "centroid_lat".to_string(),
        "centroid_lon".to_string(),
    ])?;
    for c in cells {
        w.write_record([
            c.cell.clone(),
            c.mean.to_string(),
            c.min.to_string(),
            c.max.to_string(),
            c.std.map(|s| s.to_string()).unwrap_or_default(),
            c.n.to_string(),
            c.centroid.lat.to_string(),
            c.centroid.lon.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_occurrences(out: impl Write, cells: &[OccurrenceCell]) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["species", "h3", "n_obs", "centroid_lat", "centroid_lon"])?;
    for c in cells {
        w.write_record([
            c.species.clone(),
            c.cell.clone(),
            c.n_obs.to_string(),
            c.centroid.lat.to_string(),
            c.centroid.lon.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
