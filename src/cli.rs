use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::hospital::HospitalId;
use crate::storage::StoragePaths;

const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

#[derive(Parser, Debug)]
#[command(name = "price-compare")]
#[command(about = "Hospital price-transparency comparison for wound care procedures", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load both disclosure files and serve the pricing API.
    Serve(ServeArgs),
    /// Load both disclosure files and print one comparison as JSON.
    Compare(CompareArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding the hospitals' disclosure CSVs under their default file names.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    /// Barnes Jewish disclosure file (single-code layout). Overrides --data-dir for this hospital.
    #[arg(long)]
    pub barnes_csv: Option<PathBuf>,

    /// Mercy Lincoln disclosure file (dual-code layout). Overrides --data-dir for this hospital.
    #[arg(long)]
    pub lincoln_csv: Option<PathBuf>,
}

impl DataArgs {
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.data_dir)
            .with_override(HospitalId::BarnesJewish, self.barnes_csv.clone())
            .with_override(HospitalId::Lincoln, self.lincoln_csv.clone())
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 5001)]
    pub port: u16,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Wound label as emitted by the classifier (e.g. Burn, Foot-ulcer).
    #[arg(long)]
    pub wound_type: String,

    /// First hospital id.
    #[arg(long, default_value = "barnes_jewish")]
    pub a: String,

    /// Second hospital id.
    #[arg(long, default_value = "lincoln")]
    pub b: String,
}
