use crate::constants::{limits, template};
use crate::error::{OptError, Result};
use crate::loader::{template_yaml, Preset};
use crate::options::TrainOptions;
use clap::ArgMatches;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn generate(app_m: &ArgMatches) -> Result<()> {
    let output_path = app_m.value_of("OUTPUT_FILE").unwrap_or("train_config.yml");

    let preset: Preset = app_m.value_of("PRESET").unwrap_or("esrgan").parse()?;

    let scale = match app_m.value_of("SCALE") {
        Some(raw) => parse_scale(raw)?,
        None => template::DEFAULT_SCALE,
    };

    if Path::new(output_path).exists() && !app_m.is_present("FORCE") {
        return Err(OptError::InvalidParameter(format!(
            "File {} already exists. Use --force to overwrite",
            output_path
        )));
    }

    if app_m.is_present("EXAMPLE") {
        // Keep the explanatory comments.
        fs::write(output_path, template_yaml(preset, scale))?;
        info!("Generated commented {} option file: {}", preset.label(), output_path);
    } else {
        let opts = TrainOptions::template(preset, scale)?;
        opts.save(output_path)?;
        info!("Generated {} option file: {}", preset.label(), output_path);
    }

    info!("Edit the dataset roots, then check it with:");
    info!("  sropt validate {}", output_path);

    Ok(())
}

fn parse_scale(raw: &str) -> Result<u32> {
    let scale = raw
        .parse::<u32>()
        .map_err(|_| OptError::Parse("scale must be a positive integer".to_string()))?;
    if scale < limits::MIN_SCALE || scale > limits::MAX_SCALE {
        return Err(OptError::InvalidParameter(format!(
            "scale {} is out of range. Must be between {} and {}",
            scale,
            limits::MIN_SCALE,
            limits::MAX_SCALE
        )));
    }
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale_bounds() {
        assert_eq!(parse_scale("2").unwrap(), 2);
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("9").is_err());
        assert!(parse_scale("two").is_err());
    }
}
