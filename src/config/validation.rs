//! Services file validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as an empty service list, blank names or ids, and
//! duplicate service ids. Returns a list of [`ValidationError`] values
//! with per-field suggestions.

use std::collections::HashSet;

use super::model::Config;
use crate::error::ValidationError;
use crate::switch::dictionary::normalize_name;

/// Validate a single service id. Returns `Ok(())` or a human-readable error.
pub fn validate_service_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("id cannot be empty".into());
    }
    if id.contains('/') || id.chars().any(char::is_whitespace) {
        return Err(format!("'{id}' is not a valid service id"));
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError {
            service: "(root)".into(),
            field: "services".into(),
            message: "at least one service must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_ids = HashSet::new();

    for (i, service) in config.services.iter().enumerate() {
        let service_label = if service.name.is_empty() {
            format!("services[{i}]")
        } else {
            service.name.clone()
        };

        if service.name.trim().is_empty() {
            errors.push(ValidationError {
                service: service_label.clone(),
                field: "name".into(),
                message: "name cannot be empty".into(),
                suggestion: Some("the dictionary name is derived from it".into()),
            });
        }

        if let Err(msg) = validate_service_id(&service.id) {
            errors.push(ValidationError {
                service: service_label.clone(),
                field: "id".into(),
                message: msg,
                suggestion: None,
            });
        }

        if !service.id.is_empty() && !seen_ids.insert(service.id.as_str()) {
            errors.push(ValidationError {
                service: service_label.clone(),
                field: "id".into(),
                message: "duplicate service id".into(),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!("  {} services\n", config.services.len())];

    for service in &config.services {
        let recorded = service.recorded_dictionary().unwrap_or("not provisioned");
        lines.push(format!("  {}  ({})", service.name, service.id));
        lines.push(format!("    dictionary: {}", normalize_name(&service.name)));
        lines.push(format!("    recorded id: {recorded}"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
