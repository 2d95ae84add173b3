//! `edge-switch switch`: write the routing flag for every service.
//!
//! Checks the API token, loads the services file, builds the API client,
//! and runs the switching workflow under a per-run span so every log
//! line of one invocation carries the same `run_id`.

use std::time::Duration;

use tracing::Instrument;

use crate::api::transport::HyperTransport;
use crate::api::{ApiClient, DEFAULT_RETRY_BACKOFF, TOKEN_ENV_VAR};
use crate::cli::SwitchArgs;
use crate::config;
use crate::error::SwitchError;
use crate::logging;
use crate::switch::routing::Location;
use crate::switch::{self, ServiceOutcome};

pub async fn execute(args: SwitchArgs) -> Result<(), SwitchError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let result = run(&args).await;

    #[cfg(feature = "sentry-integration")]
    if let Err(ref e) = result {
        crate::sentry_integration::capture_failure(e);
    }

    result.map(|_| ())
}

/// Everything `execute` does except process-wide logging setup.
pub async fn run(args: &SwitchArgs) -> Result<Vec<ServiceOutcome>, SwitchError> {
    let token = args
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(SwitchError::MissingToken {
            env_var: TOKEN_ENV_VAR,
        })?;

    let config = config::load(&args.config).await?;

    let transport = HyperTransport::new(Duration::from_secs(args.timeout));
    let client = ApiClient::new(Box::new(transport), &args.api_url, token)?
        .with_retries(args.retries, DEFAULT_RETRY_BACKOFF);

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", run_id = %run_id);

    async {
        tracing::info!(
            services = config.services.len(),
            location = %Location::from_flag(args.west),
            config = %args.config.display(),
            build = env!("EDGE_SWITCH_GIT_SHORT"),
            profile = env!("EDGE_SWITCH_BUILD_PROFILE"),
            "edge-switch started"
        );

        let report = switch::run(
            &client,
            &config.services,
            args.west,
            args.failure_policy(),
        )
        .await;
        report.log_summary();
        report.into_result()
    }
    .instrument(span)
    .await
}
