//! `edge-switch validate`: check a services file for errors.
//!
//! Parses and validates the file, reporting results in either
//! human-readable text or machine-readable JSON format. No API calls
//! are made.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::parse_config_str;
use crate::config::validation;
use crate::error::SwitchError;
use crate::switch::dictionary::normalize_name;

pub fn execute(args: &ValidateArgs) -> Result<(), SwitchError> {
    let path = &args.config;

    if !path.exists() {
        return Err(SwitchError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;
    let config = parse_config_str(&content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "service": e.service,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(SwitchError::ConfigValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
        }
        ValidateFormat::Json => {
            let services: Vec<serde_json::Value> = config
                .services
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name,
                        "id": s.id,
                        "dictionary": normalize_name(&s.name),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "services": services,
                })
            );
        }
    }

    Ok(())
}
