// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The group assignment handler and its lifecycle hooks.

use crate::client::OktaGroupClient;
use crate::error::AssignmentError;
use crate::types::{AssignmentResult, HaltResult, RecoveryResult};
use async_trait::async_trait;
use capstan_jobs::{param_lookup, ExecutionContext, JobHandler, JobParams};
use serde_json::Value;
use url::Url;

/// Name of the secret carrying the Okta API token.
pub const OKTA_API_TOKEN: &str = "OKTA_API_TOKEN";

const UNKNOWN: &str = "unknown";

/// Assigns an Okta user to an Okta group.
///
/// One invocation performs exactly one authenticated PUT against the org's
/// group membership endpoint. The handler is stateless across invocations;
/// the org domain arrives as a parameter and the credential as a secret on
/// the execution context.
#[derive(Debug, Clone)]
pub struct GroupAssignmentHandler {
	http: reqwest::Client,
	base_url: Option<Url>,
}

impl GroupAssignmentHandler {
	/// Handler targeting `https://{oktaDomain}` per invocation.
	pub fn new() -> Self {
		Self {
			http: capstan_common_http::new_client(),
			base_url: None,
		}
	}

	/// Route every request to a fixed base URL instead of the per-invocation
	/// domain. Used by embedders and tests pointing at a non-production
	/// endpoint; parameter validation is unchanged.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);
		self
	}

	/// A required id parameter: present, a string, and non-empty.
	fn required_param<'a>(
		params: &'a JobParams,
		key: &'static str,
	) -> Result<&'a str, AssignmentError> {
		params
			.str_param(key)
			.filter(|value| !value.is_empty())
			.ok_or(AssignmentError::InvalidParameter(key))
	}

	fn client_for(&self, domain: &str) -> Result<OktaGroupClient, AssignmentError> {
		match &self.base_url {
			Some(base) => Ok(OktaGroupClient::with_base_url(
				base.clone(),
				self.http.clone(),
			)),
			None => OktaGroupClient::for_domain(domain, self.http.clone()),
		}
	}

	/// The shared request path behind both `invoke` and the error hook's
	/// single retry: resolve the token, build the client, send the PUT.
	async fn assign(
		&self,
		user_id: &str,
		group_id: &str,
		okta_domain: &str,
		ctx: &ExecutionContext,
	) -> Result<AssignmentResult, AssignmentError> {
		let token = ctx
			.secret(OKTA_API_TOKEN)
			.filter(|token| !token.is_empty())
			.ok_or(AssignmentError::MissingSecret(OKTA_API_TOKEN))?;

		let client = self.client_for(okta_domain)?;
		client.add_user_to_group(group_id, user_id, token).await?;

		Ok(AssignmentResult::completed(user_id, group_id, okta_domain))
	}
}

impl Default for GroupAssignmentHandler {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl JobHandler for GroupAssignmentHandler {
	type Error = AssignmentError;

	/// Validate the parameter bundle, then perform the assignment.
	///
	/// Validation is fail-fast in a fixed order: `userId`, `groupId`,
	/// `oktaDomain`, then the API token secret. No request is sent until
	/// all four pass.
	async fn invoke(
		&self,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error> {
		let user_id = Self::required_param(params, "userId")?;
		let group_id = Self::required_param(params, "groupId")?;
		let okta_domain = Self::required_param(params, "oktaDomain")?;

		tracing::info!(user_id, group_id, okta_domain, "assigning user to Okta group");

		let result = self
			.assign(user_id, group_id, okta_domain, ctx)
			.await
			.inspect_err(|error| {
				tracing::error!(user_id, group_id, error = %error, "group assignment failed");
			})?;

		tracing::info!(user_id, group_id, "user assigned to group");
		Ok(serde_json::to_value(result)?)
	}

	/// Inspect a failure from a prior `invoke`.
	///
	/// A rate-limited assignment is retried exactly once, immediately,
	/// through the same validation and request path; the original
	/// parameters are resolved from the hook bundle with a fallback to the
	/// context. Every other failure is re-raised unchanged, leaving
	/// retry/backoff policy to the hosting framework.
	async fn error(
		&self,
		error: Self::Error,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error> {
		if !error.is_rate_limit() {
			tracing::warn!(error = %error, "non-retryable failure, re-raising");
			return Err(error);
		}

		let user_id = param_lookup("userId", params, ctx)
			.ok_or(AssignmentError::InvalidParameter("userId"))?;
		let group_id = param_lookup("groupId", params, ctx)
			.ok_or(AssignmentError::InvalidParameter("groupId"))?;
		let okta_domain = param_lookup("oktaDomain", params, ctx)
			.ok_or(AssignmentError::InvalidParameter("oktaDomain"))?;

		tracing::info!(user_id, group_id, "rate limited, retrying assignment once");

		self.assign(user_id, group_id, okta_domain, ctx).await?;

		tracing::info!(user_id, group_id, "assignment recovered after retry");
		Ok(serde_json::to_value(RecoveryResult { recovered: true })?)
	}

	/// Acknowledge an externally requested stop.
	///
	/// The assignment PUT either completed or never happened, so there is
	/// no partial state to unwind and no network activity here.
	async fn halt(
		&self,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error> {
		let result = HaltResult {
			user_id: param_lookup("userId", params, ctx)
				.unwrap_or(UNKNOWN)
				.to_string(),
			group_id: param_lookup("groupId", params, ctx)
				.unwrap_or(UNKNOWN)
				.to_string(),
			reason: param_lookup("reason", params, ctx).map(str::to_string),
			halted_at: chrono::Utc::now(),
			cleanup_completed: true,
		};

		tracing::info!(
			user_id = %result.user_id,
			group_id = %result.group_id,
			"halt acknowledged"
		);
		Ok(serde_json::to_value(result)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn params_for(user_id: &str, group_id: &str, domain: &str) -> JobParams {
		let mut params = JobParams::new();
		params.insert("userId", user_id);
		params.insert("groupId", group_id);
		params.insert("oktaDomain", domain);
		params
	}

	fn ctx_with_token() -> ExecutionContext {
		ExecutionContext::builder()
			.secret(OKTA_API_TOKEN, "00token")
			.build()
	}

	#[tokio::test]
	async fn invoke_rejects_missing_user_id_first() {
		let handler = GroupAssignmentHandler::new();
		let ctx = ExecutionContext::builder().build();

		let err = handler
			.invoke(&JobParams::new(), &ctx)
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), "Invalid or missing userId parameter");
	}

	#[tokio::test]
	async fn invoke_rejects_an_empty_user_id() {
		let handler = GroupAssignmentHandler::new();
		let params = params_for("", "00g1", "dev-1.okta.com");

		let err = handler.invoke(&params, &ctx_with_token()).await.unwrap_err();
		assert_eq!(err.to_string(), "Invalid or missing userId parameter");
	}

	#[tokio::test]
	async fn invoke_rejects_non_string_group_id() {
		let handler = GroupAssignmentHandler::new();
		let mut params = JobParams::new();
		params.insert("userId", "00u1");
		params.insert("groupId", 42);
		params.insert("oktaDomain", "dev-1.okta.com");

		let err = handler.invoke(&params, &ctx_with_token()).await.unwrap_err();
		assert_eq!(err.to_string(), "Invalid or missing groupId parameter");
	}

	#[tokio::test]
	async fn invoke_rejects_missing_okta_domain() {
		let handler = GroupAssignmentHandler::new();
		let mut params = JobParams::new();
		params.insert("userId", "00u1");
		params.insert("groupId", "00g1");

		let err = handler.invoke(&params, &ctx_with_token()).await.unwrap_err();
		assert_eq!(err.to_string(), "Invalid or missing oktaDomain parameter");
	}

	#[tokio::test]
	async fn invoke_requires_the_api_token_secret() {
		let handler = GroupAssignmentHandler::new();
		let params = params_for("00u1", "00g1", "dev-1.okta.com");
		let ctx = ExecutionContext::builder().build();

		let err = handler.invoke(&params, &ctx).await.unwrap_err();
		assert_eq!(err.to_string(), "Missing required secret: OKTA_API_TOKEN");
	}

	#[tokio::test]
	async fn invoke_rejects_an_empty_api_token() {
		let handler = GroupAssignmentHandler::new();
		let params = params_for("00u1", "00g1", "dev-1.okta.com");
		let ctx = ExecutionContext::builder()
			.secret(OKTA_API_TOKEN, "")
			.build();

		let err = handler.invoke(&params, &ctx).await.unwrap_err();
		assert!(matches!(err, AssignmentError::MissingSecret(_)));
	}

	#[tokio::test]
	async fn error_hook_re_raises_non_rate_limit_failures_unchanged() {
		let handler = GroupAssignmentHandler::new();
		let original = AssignmentError::Provider {
			status: 401,
			message: "Invalid credentials".to_string(),
		};

		let err = handler
			.error(original, &JobParams::new(), &ctx_with_token())
			.await
			.unwrap_err();

		assert_eq!(err.to_string(), "Invalid credentials");
		assert_eq!(err.status(), Some(401));
	}

	#[tokio::test]
	async fn error_hook_retry_surfaces_missing_parameters_as_new_failures() {
		let handler = GroupAssignmentHandler::new();
		let rate_limited = AssignmentError::Provider {
			status: 429,
			message: "API rate limit exceeded".to_string(),
		};

		// No parameters on the hook bundle and none stashed on the context.
		let err = handler
			.error(rate_limited, &JobParams::new(), &ctx_with_token())
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), "Invalid or missing userId parameter");
	}

	#[tokio::test]
	async fn halt_falls_back_to_unknown_ids() {
		let handler = GroupAssignmentHandler::new();
		let ctx = ExecutionContext::builder().build();

		let value = handler.halt(&JobParams::new(), &ctx).await.unwrap();

		assert_eq!(value["userId"], json!("unknown"));
		assert_eq!(value["groupId"], json!("unknown"));
		assert_eq!(value["cleanupCompleted"], json!(true));
		assert!(value.get("reason").is_none());
		let halted_at = value["haltedAt"].as_str().unwrap();
		assert!(chrono::DateTime::parse_from_rfc3339(halted_at).is_ok());
	}

	#[tokio::test]
	async fn halt_echoes_ids_and_reason_when_present() {
		let handler = GroupAssignmentHandler::new();
		let mut params = params_for("00u1", "00g1", "dev-1.okta.com");
		params.insert("reason", "operator cancelled");
		let ctx = ExecutionContext::builder().build();

		let value = handler.halt(&params, &ctx).await.unwrap();

		assert_eq!(value["userId"], json!("00u1"));
		assert_eq!(value["groupId"], json!("00g1"));
		assert_eq!(value["reason"], json!("operator cancelled"));
	}
}
