//! Entry point for fvcom-extract.
//! Parses the CLI, then either lists the file's contents or extracts the requested variables.

use clap::Parser;
use fvcom_extract::{
    clip::ClipSpec, decode_fvcom_time, metadata::inspect_path, read_fvcom, surface_elevation_from,
};
use ndarray::Ix1;
mod cli;

use cli::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.list_vars {
        inspect_path(&args.file)?.print();
        return Ok(());
    }

    let mut vars = args.vars.clone();
    if args.elevation_at.is_some() && !vars.iter().any(|v| v == "zeta") {
        vars.push("zeta".to_string());
    }
    if vars.is_empty() {
        return Err("Nothing to extract: pass --var <name> or --list-vars".into());
    }

    let clip: ClipSpec = args.clip.into_iter().collect();
    let clip = (!clip.is_empty()).then_some(clip);

    let data = read_fvcom(&args.file, &vars, clip.as_ref(), args.verbose)?;
    println!("Successfully read FVCOM file: {}", args.file.display());

    let mut names: Vec<&String> = data.keys().collect();
    names.sort();
    for name in names {
        println!("  {} {:?}", name, data[name].shape());
    }

    for missing in vars.iter().filter(|v| !data.contains_key(*v)) {
        println!("⚠ Variable '{}' not found in file", missing);
    }

    if let Some(time) = data.get("time") {
        if let Ok(time) = time.view().into_dimensionality::<Ix1>() {
            let decoded = decode_fvcom_time(time);
            if let (Some(Some(first)), Some(Some(last))) = (decoded.first(), decoded.last()) {
                println!("  time: {} to {}", first.to_rfc3339(), last.to_rfc3339());
            }
        }
    }

    if let Some(nodes) = args.elevation_at {
        let elevation = surface_elevation_from(&data, "zeta", &nodes.0)?;
        println!("✅ Surface elevation at {} nodes: shape {:?}", nodes.0.len(), elevation.shape());
        if args.verbose {
            println!("{:?}", elevation);
        }
    }

    Ok(())
}
