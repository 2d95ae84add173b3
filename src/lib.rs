//! edge-switch flips the routing flag of CDN services.
//!
//! Each service listed in the services file has an edge dictionary whose
//! `west` item selects where traffic is served from. edge-switch makes
//! sure the dictionary exists (cloning the active configuration version
//! when it has to create one) and then writes the flag through the live
//! item endpoint, which takes effect without activating a version.
//!
//! # Architecture
//!
//! - [`api`] -- Authenticated API client, the [`Transport`](api::Transport)
//!   seam, and serde models of the remote responses.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (switch, init, validate).
//! - [`config`] -- Services file loading and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`switch`] -- The workflow: editable version resolution, dictionary
//!   reconciliation, and the routing flag write.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sentry-integration` | Sentry error tracking |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod switch;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
