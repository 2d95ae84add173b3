//! Find or create the edge dictionary holding a service's routing flag.
//!
//! The dictionary name is derived from the service name by
//! [`normalize_name`], so repeated runs converge on the same dictionary
//! instead of creating duplicates.

use http::{Method, StatusCode};

use crate::api::model::{decode, Dictionary};
use crate::api::{form_body, ApiClient};
use crate::config::model::Service;
use crate::error::SwitchError;

/// Dictionary name for a service: `.` and `-` become `_`.
#[must_use]
pub fn normalize_name(service_name: &str) -> String {
    service_name.replace(['.', '-'], "_")
}

/// Look up the service's dictionary on `version`. A 404, or a body with
/// no id, means the dictionary does not exist yet.
pub async fn find_dictionary(
    client: &ApiClient,
    service: &Service,
    version: u32,
) -> Result<Option<String>, SwitchError> {
    let name = normalize_name(&service.name);
    let version = version.to_string();
    let url = client.endpoint(&[
        "service",
        service.id.as_str(),
        "version",
        version.as_str(),
        "dictionary",
        name.as_str(),
    ])?;

    let response = client.send(Method::GET, url.clone(), None).await?;
    if response.status == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let body = response.error_for_status(&Method::GET, &url)?;
    let dictionary: Dictionary = decode("dictionary", &body)?;
    Ok(Some(dictionary.id).filter(|id| !id.is_empty()))
}

/// Create the service's dictionary on `version` and return its id.
pub async fn create_dictionary(
    client: &ApiClient,
    service: &Service,
    version: u32,
) -> Result<String, SwitchError> {
    let name = normalize_name(&service.name);
    let version = version.to_string();
    let url = client.endpoint(&[
        "service",
        service.id.as_str(),
        "version",
        version.as_str(),
        "dictionary",
    ])?;

    let body = client
        .call(Method::POST, url, Some(form_body(&[("name", name.as_str())])))
        .await?;
    let id = match decode::<Dictionary>("dictionary", &body) {
        Ok(dictionary) => dictionary.id,
        Err(e) => {
            tracing::warn!(
                service = %service.name,
                error = %e,
                "unreadable dictionary creation response"
            );
            String::new()
        }
    };

    if id.is_empty() {
        return Err(SwitchError::ProvisioningFailed {
            service: service.name.clone(),
        });
    }
    Ok(id)
}

/// Return the id of the service's dictionary on `version`, creating the
/// dictionary when it does not exist.
pub async fn ensure_dictionary(
    client: &ApiClient,
    service: &Service,
    version: u32,
) -> Result<String, SwitchError> {
    if let Some(id) = find_dictionary(client, service, version).await? {
        tracing::info!(
            service = %service.name,
            version,
            dictionary = %id,
            "found existing edge dictionary"
        );
        return Ok(id);
    }

    let id = create_dictionary(client, service, version).await?;
    tracing::info!(
        service = %service.name,
        version,
        dictionary = %id,
        name = %normalize_name(&service.name),
        "created edge dictionary"
    );
    Ok(id)
}
