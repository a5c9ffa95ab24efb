use crate::constants::file;
use crate::error::{OptError, Result};
use crate::options::TrainOptions;
use crate::validate::{check_options, Severity};
use clap::ArgMatches;
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub fn validate(app_m: &ArgMatches) -> Result<()> {
    let strict = app_m.is_present("STRICT");

    let paths = app_m
        .values_of("PATHS")
        .ok_or_else(|| OptError::InvalidParameter("no paths given".to_string()))?;

    let mut files = Vec::new();
    for raw in paths {
        collect_option_files(Path::new(raw), &mut files)?;
    }
    if files.is_empty() {
        return Err(OptError::InvalidParameter(
            "no .yml/.yaml option files found".to_string(),
        ));
    }

    let mut failures = 0usize;
    for path in &files {
        if check_file(path, strict)? {
            info!("{}: ok", path.display());
        } else {
            failures += 1;
        }
    }

    if failures > 0 {
        Err(OptError::Validation(format!(
            "{} of {} documents failed validation",
            failures,
            files.len()
        )))
    } else {
        info!("{} documents validated", files.len());
        Ok(())
    }
}

/// Validates one file, logging every finding. Returns whether it passed.
fn check_file(path: &Path, strict: bool) -> Result<bool> {
    let opts = match TrainOptions::load(path) {
        Ok(opts) => opts,
        Err(err) => {
            error!("{}: {}", path.display(), err);
            return Ok(false);
        },
    };

    let report = check_options(&opts, strict);
    for issue in &report.issues {
        match issue.severity {
            Severity::Error => error!("{}: {}", path.display(), issue),
            Severity::Warning => warn!("{}: {}", path.display(), issue),
        }
    }
    Ok(report.is_clean())
}

fn collect_option_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_dir() {
        for ext in [file::YML_EXTENSION, file::YAML_EXTENSION] {
            let pattern = format!("{}/*.{}", path.display(), ext);
            let entries = glob(&pattern)
                .map_err(|e| OptError::InvalidParameter(format!("bad glob pattern: {}", e)))?;
            for entry in entries {
                files.push(entry.map_err(|e| OptError::Io(e.into()))?);
            }
        }
        Ok(())
    } else if path.exists() {
        files.push(path.to_path_buf());
        Ok(())
    } else {
        Err(OptError::FileNotFound(path.to_path_buf()))
    }
}
