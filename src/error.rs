//! Unified error types for edge-switch.
//!
//! Defines [`SwitchError`] (the main crate error enum) and
//! [`ValidationError`] for services-file validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

use http::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub service: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  service {}: {}: {}",
            self.service, self.field, self.message
        )?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SwitchError {
    #[error("Config file not found: {}\n\n  Run 'edge-switch init' to create one.", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Missing API token: set {env_var}")]
    MissingToken { env_var: &'static str },

    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Error creating {method} request to {url}: {source}")]
    RequestBuild {
        method: http::Method,
        url: String,
        #[source]
        source: http::Error,
    },

    #[error("Error making {method} request to {url}: {source}")]
    HttpRequest {
        method: http::Method,
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{method} request to {url} timed out after {}s", timeout.as_secs())]
    Timeout {
        method: http::Method,
        url: String,
        timeout: std::time::Duration,
    },

    #[error("Error reading {method} response from {url}: {source}")]
    ResponseBody {
        method: http::Method,
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{method} {url} returned {status}: {body}")]
    ApiStatus {
        method: http::Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Unexpected {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no versions found for service {service}")]
    NoVersions { service: String },

    #[error("cloning version {active} of service {service} did not produce a new version (got {cloned})")]
    CloneDidNotAdvance {
        service: String,
        active: u32,
        cloned: u32,
    },

    #[error("failed to create a dictionary for the non-active service version: {service}")]
    ProvisioningFailed { service: String },

    #[error("routing flag for {service} was not applied: requested {requested}, remote holds {actual}")]
    RoutingNotApplied {
        service: String,
        requested: bool,
        actual: String,
    },

    #[error("{failed} of {total} services failed to switch")]
    RunFailed { failed: usize, total: usize },
}

impl SwitchError {
    /// Whether repeating the same request could succeed.
    ///
    /// Network failures, timeouts and 5xx responses are transient; 4xx
    /// responses and everything local to this process are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest { .. } | Self::Timeout { .. } | Self::ResponseBody { .. } => true,
            Self::ApiStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
