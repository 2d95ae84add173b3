//! The switching workflow, one service at a time.
//!
//! For each service: resolve an editable version ([`version`]), make sure
//! the edge dictionary exists on it ([`dictionary`]), then write the
//! routing flag through the live item endpoint ([`routing`]). Services
//! are processed sequentially in input order; what happens after a
//! failure is decided by the [`FailurePolicy`].

pub mod dictionary;
pub mod routing;
pub mod version;

use tracing::Instrument;

use crate::api::ApiClient;
use crate::config::model::Service;
use crate::error::SwitchError;
use routing::Location;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing service.
    #[default]
    FailFast,
    /// Process every service and report all failures at the end.
    KeepGoing,
}

#[derive(Debug, Clone)]
pub struct ServiceOutcome {
    pub service: String,
    pub version: u32,
    pub dictionary_id: String,
    pub location: Location,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Vec<ServiceOutcome>,
    pub failed: Vec<(String, SwitchError)>,
    /// Services never attempted because an earlier one failed.
    pub skipped: Vec<String>,
}

impl RunReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len() + self.skipped.len()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn log_summary(&self) {
        for outcome in &self.completed {
            tracing::info!(
                service = %outcome.service,
                version = outcome.version,
                dictionary = %outcome.dictionary_id,
                location = %outcome.location,
                "switched"
            );
        }
        for (service, error) in &self.failed {
            tracing::error!(service = %service, error = %error, "failed");
        }
        for service in &self.skipped {
            tracing::warn!(service = %service, "not processed");
        }
        tracing::info!(
            completed = self.completed.len(),
            failed = self.failed.len(),
            skipped = self.skipped.len(),
            "run finished"
        );
    }

    /// A single failure is returned as-is; several are summarised as
    /// [`SwitchError::RunFailed`].
    pub fn into_result(mut self) -> Result<Vec<ServiceOutcome>, SwitchError> {
        let total = self.total();
        match self.failed.len() {
            0 => Ok(self.completed),
            1 => Err(self.failed.remove(0).1),
            failed => Err(SwitchError::RunFailed { failed, total }),
        }
    }
}

/// Run the whole workflow for one service.
pub async fn switch_service(
    client: &ApiClient,
    service: &Service,
    west: bool,
) -> Result<ServiceOutcome, SwitchError> {
    let version = version::resolve_editable_version(client, service).await?;
    let dictionary_id = dictionary::ensure_dictionary(client, service, version).await?;

    if let Some(recorded) = service.recorded_dictionary() {
        if recorded != dictionary_id {
            tracing::warn!(
                recorded,
                resolved = %dictionary_id,
                "services file records a different dictionary id, using the resolved one"
            );
        }
    }

    let update = routing::apply_routing(client, service, &dictionary_id, west).await?;

    Ok(ServiceOutcome {
        service: service.name.clone(),
        version,
        dictionary_id,
        location: update.location,
    })
}

/// Switch every service in order, applying `policy` on failure.
pub async fn run(
    client: &ApiClient,
    services: &[Service],
    west: bool,
    policy: FailurePolicy,
) -> RunReport {
    let mut report = RunReport::default();

    for (i, service) in services.iter().enumerate() {
        let span = tracing::info_span!("service", name = %service.name, id = %service.id);

        match switch_service(client, service, west).instrument(span).await {
            Ok(outcome) => report.completed.push(outcome),
            Err(e) => {
                tracing::error!(service = %service.name, error = %e, "switch failed");
                report.failed.push((service.name.clone(), e));

                if policy == FailurePolicy::FailFast {
                    report.skipped = services[i + 1..]
                        .iter()
                        .map(|s| s.name.clone())
                        .collect();
                    break;
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{describe, FakeTransport};

    fn service(name: &str, id: &str) -> Service {
        Service {
            name: name.into(),
            id: id.into(),
            dictionary: None,
        }
    }

    fn script_success(fake: &FakeTransport) {
        fake.reply(200, r#"{"versions": [{"number": 1, "active": false}]}"#)
            .reply(200, r#"{"id": "dict"}"#)
            .reply(
                200,
                r#"{"item_key": "west", "item_value": "true", "dictionary_id": "dict"}"#,
            );
    }

    #[tokio::test]
    async fn active_service_is_cloned_provisioned_and_switched() {
        let fake = FakeTransport::new();
        fake.reply(
            200,
            r#"{"versions": [{"number": 1, "active": false}, {"number": 3, "active": true}]}"#,
        )
        .reply(200, r#"{"number": 4, "active": false}"#)
        .reply(404, r#"{"msg": "Record not found"}"#)
        .reply(200, r#"{"id": "new-dict", "name": "my_site_com", "version": 4}"#)
        .reply(
            200,
            r#"{"item_key": "west", "item_value": "true", "dictionary_id": "new-dict"}"#,
        );

        let outcome = switch_service(&fake.client(), &service("my.site-com", "svc"), true)
            .await
            .unwrap();
        assert_eq!(outcome.version, 4);
        assert_eq!(outcome.dictionary_id, "new-dict");
        assert_eq!(outcome.location, Location::West);

        let requests: Vec<String> = fake.requests().iter().map(describe).collect();
        assert_eq!(
            requests,
            vec![
                "GET /service/svc",
                "PUT /service/svc/version/3/clone",
                "GET /service/svc/version/4/dictionary/my_site_com",
                "POST /service/svc/version/4/dictionary",
                "PATCH /service/svc/dictionary/new-dict/item/west",
            ]
        );
    }

    #[tokio::test]
    async fn recorded_dictionary_is_not_trusted() {
        let fake = FakeTransport::new();
        script_success(&fake);
        let mut svc = service("a.com", "svc");
        svc.dictionary = Some("stale".into());

        let outcome = switch_service(&fake.client(), &svc, true).await.unwrap();
        assert_eq!(outcome.dictionary_id, "dict");
        assert_eq!(
            describe(&fake.requests()[2]),
            "PATCH /service/svc/dictionary/dict/item/west"
        );
    }

    #[tokio::test]
    async fn fail_fast_stops_and_records_skipped_services() {
        let fake = FakeTransport::new();
        script_success(&fake);
        fake.reply(200, r#"{"versions": []}"#);

        let services = vec![
            service("a.com", "one"),
            service("b.com", "two"),
            service("c.com", "three"),
        ];
        let report = run(&fake.client(), &services, true, FailurePolicy::FailFast).await;

        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.skipped, vec!["c.com"]);
        assert_eq!(fake.requests().len(), 4);

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "no versions found for service b.com");
    }

    #[tokio::test]
    async fn keep_going_processes_every_service() {
        let fake = FakeTransport::new();
        fake.reply(200, r#"{"versions": []}"#);
        script_success(&fake);
        fake.reply(200, r#"{"versions": []}"#);

        let services = vec![
            service("a.com", "one"),
            service("b.com", "two"),
            service("c.com", "three"),
        ];
        let report = run(&fake.client(), &services, true, FailurePolicy::KeepGoing).await;

        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.completed[0].service, "b.com");
        assert_eq!(report.failed.len(), 2);
        assert!(report.skipped.is_empty());
        assert!(!report.is_success());

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, SwitchError::RunFailed { failed: 2, total: 3 }));
    }

    #[tokio::test]
    async fn successful_run_returns_every_outcome() {
        let fake = FakeTransport::new();
        script_success(&fake);
        script_success(&fake);

        let services = vec![service("a.com", "one"), service("b.com", "two")];
        let report = run(&fake.client(), &services, true, FailurePolicy::FailFast).await;
        assert!(report.is_success());
        assert_eq!(report.into_result().unwrap().len(), 2);
    }
}
