use crate::error::{OptError, Result};
use crate::loader::normalize_str;
use clap::ArgMatches;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn normalize(app_m: &ArgMatches) -> Result<()> {
    let input_path = app_m
        .value_of("INPUT_FILE")
        .ok_or_else(|| OptError::InvalidParameter("no input file given".to_string()))?;

    let input = Path::new(input_path);
    if !input.exists() {
        return Err(OptError::FileNotFound(input.to_path_buf()));
    }

    let contents = fs::read_to_string(input)?;
    let canonical = normalize_str(&contents)?;

    match app_m.value_of("OUTPUT_FILE") {
        Some(output_path) => {
            fs::write(output_path, canonical)?;
            info!("Wrote canonical document to {}", output_path);
        },
        None => print!("{}", canonical),
    }

    Ok(())
}
