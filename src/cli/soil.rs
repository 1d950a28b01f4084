//! CLI commands for the soil series reference table.
use crate::soil::{SOIL_SERIES, SoilSeries, find_soil_series};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::{self, Write};

/// Subcommands for the soil series table
#[derive(Subcommand)]
pub enum SoilSubcommands {
    /// List all known soil series
    List {
        /// Write the table as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Look up a soil series by name or code
    Lookup {
        /// The name or code of the soil series (case-insensitive)
        name_or_code: String,
    },
}

impl SoilSubcommands {
    /// Execute the supplied soil subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List { csv } => handle_soil_list_command(csv)?,
            Self::Lookup { name_or_code } => handle_soil_lookup_command(&name_or_code)?,
        }

        Ok(())
    }
}

/// Format a row of the soil series table
fn format_series(series: &SoilSeries) -> String {
    format!("{:<8} {:<24} {}", series.code, series.name, series.class)
}

/// Write the soil series table as CSV
fn write_soil_csv<W: Write>(writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for series in SOIL_SERIES {
        writer.serialize(series)?;
    }
    writer.flush()?;

    Ok(())
}

/// Handle the `soil list` command
fn handle_soil_list_command(csv: bool) -> Result<()> {
    if csv {
        return write_soil_csv(io::stdout().lock());
    }

    println!("{:<8} {:<24} Class", "Code", "Name");
    for series in SOIL_SERIES {
        println!("{}", format_series(series));
    }

    Ok(())
}

/// Handle the `soil lookup` command
fn handle_soil_lookup_command(name_or_code: &str) -> Result<()> {
    let series = find_soil_series(name_or_code)
        .with_context(|| format!("Unknown soil series: {name_or_code}"))?;
    println!("{}", format_series(series));

    Ok(())
}
