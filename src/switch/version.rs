//! Resolve a configuration version that is safe to edit.
//!
//! Active versions serve live traffic and cannot be modified, so when the
//! latest version is active it is cloned and the clone is edited instead.

use http::Method;

use crate::api::model::{decode, ServiceDetails, ServiceVersion};
use crate::api::ApiClient;
use crate::config::model::Service;
use crate::error::SwitchError;

/// Fetch the latest version of `service`. An empty version list is
/// reported as [`SwitchError::NoVersions`].
pub async fn latest_version(
    client: &ApiClient,
    service: &Service,
) -> Result<ServiceVersion, SwitchError> {
    let url = client.endpoint(&["service", service.id.as_str()])?;
    let body = client.call(Method::GET, url, None).await?;
    let mut details: ServiceDetails = decode("service", &body)?;

    details
        .versions
        .pop()
        .ok_or_else(|| SwitchError::NoVersions {
            service: service.name.clone(),
        })
}

/// Return the number of a non-active version of `service`, cloning the
/// latest version only when it is active.
pub async fn resolve_editable_version(
    client: &ApiClient,
    service: &Service,
) -> Result<u32, SwitchError> {
    let latest = latest_version(client, service).await?;

    if !latest.active {
        tracing::info!(
            service = %service.name,
            version = latest.number,
            "latest version is not active, editing it in place"
        );
        return Ok(latest.number);
    }

    let active = latest.number.to_string();
    let url = client.endpoint(&[
        "service",
        service.id.as_str(),
        "version",
        active.as_str(),
        "clone",
    ])?;
    let body = client.call(Method::PUT, url, None).await?;
    let cloned: ServiceVersion = decode("clone", &body)?;

    if cloned.number == latest.number {
        return Err(SwitchError::CloneDidNotAdvance {
            service: service.name.clone(),
            active: latest.number,
            cloned: cloned.number,
        });
    }

    tracing::info!(
        service = %service.name,
        active = latest.number,
        cloned = cloned.number,
        "cloned active version"
    );
    Ok(cloned.number)
}
