// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client for the Okta group membership endpoint.

use crate::error::AssignmentError;
use capstan_common_secret::SecretString;
use serde::Deserialize;
use url::Url;

/// Okta's custom Authorization scheme prefix, including the trailing space.
pub const SSWS_PREFIX: &str = "SSWS ";

/// Error body returned by Okta on non-success responses. Parsed best-effort;
/// either field may be absent and the body may not be JSON at all.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderErrorBody {
	#[serde(default)]
	error_code: Option<String>,
	#[serde(default)]
	error_summary: Option<String>,
}

/// Client for assigning users to groups on one Okta org.
///
/// Holds the org's base URL and a shared HTTP client. The credential is not
/// held here; it is supplied per call so the client itself never outlives a
/// secret's scope.
#[derive(Debug, Clone)]
pub struct OktaGroupClient {
	http: reqwest::Client,
	base_url: Url,
}

impl OktaGroupClient {
	/// Client for the org at `https://{domain}`.
	///
	/// # Errors
	///
	/// Returns [`AssignmentError::InvalidDomain`] when the domain does not
	/// form a valid base URL.
	pub fn for_domain(domain: &str, http: reqwest::Client) -> Result<Self, AssignmentError> {
		let base_url = Url::parse(&format!("https://{domain}"))
			.map_err(|_| AssignmentError::InvalidDomain(domain.to_string()))?;
		Ok(Self { http, base_url })
	}

	/// Client for an explicit base URL. Used by embedders and tests that
	/// point the handler at a non-production endpoint.
	pub fn with_base_url(base_url: Url, http: reqwest::Client) -> Self {
		Self { http, base_url }
	}

	/// The group membership endpoint for the given pair of ids.
	///
	/// Each id is appended as its own path segment, which percent-encodes
	/// reserved characters; a `/` inside an id cannot open a new segment.
	pub fn membership_url(&self, group_id: &str, user_id: &str) -> Result<Url, AssignmentError> {
		let mut url = self.base_url.clone();
		url
			.path_segments_mut()
			.map_err(|_| AssignmentError::InvalidDomain(self.base_url.to_string()))?
			.pop_if_empty()
			.extend(["api", "v1", "groups", group_id, "users", user_id]);
		Ok(url)
	}

	/// Normalize a token into an `SSWS` Authorization header value.
	///
	/// Operators paste tokens both with and without the scheme prefix; the
	/// header must carry it exactly once.
	pub fn authorization_header(token: &SecretString) -> String {
		let raw = token.expose();
		if raw.starts_with(SSWS_PREFIX) {
			raw.to_string()
		} else {
			format!("{SSWS_PREFIX}{raw}")
		}
	}

	/// Assign a user to a group via `PUT /api/v1/groups/{g}/users/{u}`.
	///
	/// Okta answers 204 No Content on success. Non-success responses are
	/// mapped to [`AssignmentError::Provider`] carrying the provider's
	/// `errorSummary` when the body yields one, and the HTTP status either
	/// way. Send failures surface as [`AssignmentError::Transport`].
	#[tracing::instrument(skip(self, token), fields(group_id = %group_id, user_id = %user_id))]
	pub async fn add_user_to_group(
		&self,
		group_id: &str,
		user_id: &str,
		token: &SecretString,
	) -> Result<(), AssignmentError> {
		let url = self.membership_url(group_id, user_id)?;
		tracing::debug!(url = %url, "sending group membership request");

		let response = self
			.http
			.put(url)
			.header("Authorization", Self::authorization_header(token))
			.header("Accept", "application/json")
			.header("Content-Type", "application/json")
			.send()
			.await?;

		let status = response.status();
		if status.is_success() {
			tracing::debug!(status = status.as_u16(), "group membership accepted");
			return Ok(());
		}

		let body = response.text().await.unwrap_or_default();
		let parsed = serde_json::from_str::<ProviderErrorBody>(&body).ok();

		if let Some(code) = parsed.as_ref().and_then(|b| b.error_code.as_deref()) {
			tracing::warn!(
				status = status.as_u16(),
				error_code = code,
				"Okta rejected group membership request"
			);
		}

		let message = parsed
			.and_then(|b| b.error_summary)
			.unwrap_or_else(|| format!("Failed to assign user to group: HTTP {}", status.as_u16()));

		Err(AssignmentError::Provider {
			status: status.as_u16(),
			message,
		})
	}
}
