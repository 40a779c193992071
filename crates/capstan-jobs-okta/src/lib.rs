// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Okta group membership assignment job handler for Capstan.
//!
//! This crate implements one job: assign an Okta user to an Okta group. The
//! hosting framework drives it through the three lifecycle hooks of
//! [`capstan_jobs::JobHandler`]:
//!
//! 1. **invoke** — validate the parameter bundle (`userId`, `groupId`,
//!    `oktaDomain`, plus the `OKTA_API_TOKEN` secret), then issue a single
//!    authenticated `PUT https://{oktaDomain}/api/v1/groups/{groupId}/users/{userId}`.
//!    Okta answers 204 No Content when the membership is in place.
//!
//! 2. **error** — called by the framework with a failure from a prior
//!    invoke. A provider rate limit (recognized by the `rate limit`
//!    substring in the message) is retried exactly once, immediately;
//!    everything else is re-raised unchanged for the framework's own
//!    retry and alerting policy.
//!
//! 3. **halt** — acknowledges an externally requested stop. The single PUT
//!    is atomic from this handler's viewpoint, so there is nothing to
//!    unwind; the hook only reports.
//!
//! # Domain Configuration
//!
//! Okta orgs live on per-organization domains:
//! - Development: `dev-123456.okta.com`
//! - Preview: `yourcompany.oktapreview.com`
//! - Production: `yourcompany.okta.com`
//!
//! The domain arrives as an invocation parameter, not static configuration,
//! so one deployment of the handler can serve many orgs.
//!
//! # Authentication
//!
//! Okta's management API uses the proprietary `SSWS` Authorization scheme:
//! the literal prefix `SSWS ` followed by an API token. Tokens are supplied
//! via the execution context's secrets as [`SecretString`] values and are
//! normalized so the header carries the prefix whether or not the stored
//! secret already includes it.
//!
//! # Example
//!
//! ```rust,no_run
//! use capstan_jobs::{ExecutionContext, JobHandler, JobParams};
//! use capstan_jobs_okta::GroupAssignmentHandler;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = GroupAssignmentHandler::new();
//!
//! let mut params = JobParams::new();
//! params.insert("userId", "00u1ab2cd3EFGHIJK456");
//! params.insert("groupId", "00g9zy8xw7VUTSRQP654");
//! params.insert("oktaDomain", "dev-123456.okta.com");
//!
//! let ctx = ExecutionContext::builder()
//!     .secret("OKTA_API_TOKEN", "00aBcDeFgHiJkLmNoPqRsT")
//!     .build();
//!
//! let result = handler.invoke(&params, &ctx).await?;
//! assert_eq!(result["assigned"], serde_json::json!(true));
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The API token is wrapped in [`SecretString`] and never logged.
//! - `userId` and `groupId` are appended to the endpoint URL as individual
//!   percent-encoded path segments, so an id containing `/` cannot address
//!   a different resource.
//! - Tracing instrumentation skips the token parameter.
//!
//! [`SecretString`]: capstan_common_secret::SecretString

pub mod client;
pub mod error;
pub mod handler;
pub mod types;

pub use client::{OktaGroupClient, SSWS_PREFIX};
pub use error::AssignmentError;
pub use handler::{GroupAssignmentHandler, OKTA_API_TOKEN};
pub use types::{AssignmentResult, HaltResult, RecoveryResult};
