use clap::Parser;
use env_logger::{Builder, Env};
use log::info;
use std::path::PathBuf;

use gedi_biomass::batch::BatchRunner;
use gedi_biomass::bbox::Bbox;
use gedi_biomass::config::Config;
use gedi_biomass::readers::Backend;
use gedi_biomass::registry::VariableRegistry;

#[derive(Debug, Parser)]
#[command(name = "gedi-biomass", about = "Biomass Processing")]
struct Args {
    /// Source file or directory
    #[arg(short, long)]
    file: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Region of interest as upper-left and lower-right corners: ulx,uly,lrx,lry
    #[arg(short, long, allow_hyphen_values = true)]
    bbox: Option<Bbox>,

    /// Variable code whose files are subset to the bounding box
    #[arg(short, long)]
    variable: Option<String>,

    /// Raster decoding library
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Search sub-directories
    #[arg(short, long)]
    recursive: bool,

    /// Summarize the files
    #[arg(short, long)]
    summary: bool,

    /// Print the batch report as JSON; stdout then holds a single JSON document
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut builder = Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()));
    builder.format_timestamp_secs();
    builder.init();

    info!("Starting");

    let registry = VariableRegistry::gedi_l4b();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(bbox) = args.bbox {
        config = config.with_bbox(bbox);
    }
    if let Some(code) = args.variable {
        config = config.with_target_variable(code, &registry)?;
    }
    if let Some(backend) = args.backend {
        config = config.with_backend(backend);
    }
    if args.recursive {
        config = config.with_recursive(true);
    }

    let runner = BatchRunner::new(config, &registry);
    let files = runner.discover(&args.file)?;
    info!("Found {} files to process", files.len());

    let batch = runner.run(&files);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print!("{}", batch);
    }
    if args.summary {
        print!("{}", batch.summary());
    }

    if !batch.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_json_conflicts_with_summary() {
        let err = Args::try_parse_from(["gedi-biomass", "-f", "data", "--json", "--summary"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let json = Args::try_parse_from(["gedi-biomass", "-f", "data", "--json"]).unwrap();
        assert!(json.json && !json.summary);

        let text = Args::try_parse_from(["gedi-biomass", "-f", "data", "-s"]).unwrap();
        assert!(text.summary && !text.json);
    }

    #[test]
    fn test_bbox_accepts_negative_corners() {
        let args =
            Args::try_parse_from(["gedi-biomass", "-f", "data", "-b", "-112,36,-110,33"]).unwrap();
        assert_eq!(
            args.bbox,
            Some(Bbox::from_corners((-112.0, 36.0), (-110.0, 33.0)).unwrap())
        );
    }
}
