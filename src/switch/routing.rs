//! Write the routing flag into a service's edge dictionary.
//!
//! The item endpoint is not version-scoped: the write reaches live traffic
//! immediately, without cloning or activating a version.

use std::fmt;

use http::Method;

use crate::api::model::{decode, DictionaryItem};
use crate::api::{form_body, ApiClient};
use crate::config::model::Service;
use crate::error::SwitchError;

/// Dictionary key holding the flag. `true` routes traffic west.
pub const ROUTING_KEY: &str = "west";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    East,
    West,
}

impl Location {
    #[must_use]
    pub const fn from_flag(west: bool) -> Self {
        if west {
            Self::West
        } else {
            Self::East
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse the value of the `--west` flag. Only `"true"` selects west.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

#[derive(Debug, Clone)]
pub struct RoutingUpdate {
    pub location: Location,
    pub item: DictionaryItem,
    pub raw: String,
}

/// Set the `west` item of `dictionary_id` to `value` and check that the
/// API echoes the new value back.
pub async fn apply_routing(
    client: &ApiClient,
    service: &Service,
    dictionary_id: &str,
    value: bool,
) -> Result<RoutingUpdate, SwitchError> {
    let location = Location::from_flag(value);
    tracing::info!(
        %location,
        "attempting to serve {} ({}) from {}",
        service.name,
        service.id,
        location
    );

    let url = client.endpoint(&[
        "service",
        service.id.as_str(),
        "dictionary",
        dictionary_id,
        "item",
        ROUTING_KEY,
    ])?;
    let requested = value.to_string();
    let raw = client
        .call(
            Method::PATCH,
            url,
            Some(form_body(&[("item_value", requested.as_str())])),
        )
        .await?;

    let item: DictionaryItem = decode("dictionary item", &raw)?;
    if item.item_value != requested {
        return Err(SwitchError::RoutingNotApplied {
            service: service.name.clone(),
            requested: value,
            actual: item.item_value,
        });
    }

    tracing::info!(
        service = %service.name,
        dictionary = %dictionary_id,
        response = %raw,
        "dictionary updated"
    );
    Ok(RoutingUpdate {
        location,
        item,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{describe, FakeTransport};

    fn service() -> Service {
        Service {
            name: "www.example.com".into(),
            id: "abc".into(),
            dictionary: None,
        }
    }

    fn item_response(value: &str) -> String {
        format!(
            r#"{{"dictionary_id": "dict-1", "service_id": "abc", "item_key": "west", "item_value": "{value}"}}"#
        )
    }

    #[test]
    fn labels_follow_the_flag() {
        assert_eq!(Location::from_flag(true).label(), "west");
        assert_eq!(Location::from_flag(false).label(), "east");
        assert_eq!(Location::West.to_string(), "west");
    }

    #[test]
    fn only_true_selects_west() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[tokio::test]
    async fn true_is_written_to_the_west_key() {
        let fake = FakeTransport::new();
        fake.reply(200, &item_response("true"));

        let update = apply_routing(&fake.client(), &service(), "dict-1", true)
            .await
            .unwrap();
        assert_eq!(update.location, Location::West);
        assert_eq!(update.item.item_key, "west");

        let requests = fake.requests();
        assert_eq!(
            describe(&requests[0]),
            "PATCH /service/abc/dictionary/dict-1/item/west"
        );
        assert_eq!(requests[0].body.as_deref(), Some("item_value=true"));
    }

    #[tokio::test]
    async fn false_is_written_to_the_west_key() {
        let fake = FakeTransport::new();
        fake.reply(200, &item_response("false"));

        let update = apply_routing(&fake.client(), &service(), "dict-1", false)
            .await
            .unwrap();
        assert_eq!(update.location, Location::East);
        assert!(update.raw.contains(r#""item_value": "false""#));

        let requests = fake.requests();
        assert_eq!(requests[0].url.path(), "/service/abc/dictionary/dict-1/item/west");
        assert_eq!(requests[0].body.as_deref(), Some("item_value=false"));
    }

    #[tokio::test]
    async fn mismatched_echo_is_an_error() {
        let fake = FakeTransport::new();
        fake.reply(200, &item_response("false"));

        let err = apply_routing(&fake.client(), &service(), "dict-1", true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SwitchError::RoutingNotApplied { requested: true, ref actual, .. } if actual == "false"
        ));
    }
}
