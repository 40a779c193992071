// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Framework-facing result payloads.
//!
//! Hook results cross the framework boundary as JSON objects with camelCase
//! keys; timestamps are RFC 3339 UTC.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Successful group assignment record.
///
/// Only produced after Okta has accepted the membership change; there is no
/// partial form of this value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResult {
	pub user_id: String,
	pub group_id: String,
	pub assigned: bool,
	pub okta_domain: String,
	pub assigned_at: DateTime<Utc>,
}

impl AssignmentResult {
	/// Record a completed assignment, stamped now.
	pub fn completed(user_id: &str, group_id: &str, okta_domain: &str) -> Self {
		Self {
			user_id: user_id.to_string(),
			group_id: group_id.to_string(),
			assigned: true,
			okta_domain: okta_domain.to_string(),
			assigned_at: Utc::now(),
		}
	}
}

/// Acknowledgment returned by the halt hook.
///
/// The single PUT is atomic from the handler's viewpoint, so there is never
/// partial state to unwind; `cleanup_completed` is unconditionally true.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HaltResult {
	pub user_id: String,
	pub group_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	pub halted_at: DateTime<Utc>,
	pub cleanup_completed: bool,
}

/// Acknowledgment returned by the error hook after a successful retry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResult {
	pub recovered: bool,
}
