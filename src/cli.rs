//! Defines command-line interface options using `clap` for fvcom-extract.

use clap::Parser;
use fvcom_extract::clip::{parse_clip_pair, DimSelection};
use std::path::PathBuf;

/// A CLI tool for extracting variables from FVCOM NetCDF output
#[derive(Parser, Debug)]
#[command(
    version,
    name = "fvcom-extract",
    about = "Extract variables and surface elevation from FVCOM NetCDF output"
)]
pub struct Args {
    /// Path to the FVCOM NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Variable to extract; repeat for several
    #[arg(long = "var")]
    pub vars: Vec<String>,

    /// Restrict a dimension, formatted as <dim>=<start:end[:step]>, <dim>=[i, j, k] or <dim>=<i>
    #[arg(long, value_parser = parse_clip_arg)]
    pub clip: Vec<(String, DimSelection)>,

    /// Node indices for a surface elevation time series from `zeta`, comma separated; `-` or `nan` marks a gap
    #[arg(long, value_parser = parse_node_list)]
    pub elevation_at: Option<NodeList>,

    /// List all variables and dimensions in the file
    #[arg(long)]
    pub list_vars: bool,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Node indices with gaps, as given to `--elevation-at`
#[derive(Debug, Clone)]
pub struct NodeList(pub Vec<Option<usize>>);

fn parse_clip_arg(s: &str) -> Result<(String, DimSelection), String> {
    parse_clip_pair(s).map_err(|e| e.to_string())
}

fn parse_node_list(s: &str) -> Result<NodeList, String> {
    s.split(',')
        .map(str::trim)
        .map(|item| match item {
            "-" => Ok(None),
            _ if item.eq_ignore_ascii_case("nan") => Ok(None),
            _ => item
                .parse::<usize>()
                .map(Some)
                .map_err(|_| format!("Invalid node index '{}'", item)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(NodeList)
}
