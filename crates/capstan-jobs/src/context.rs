// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Execution context supplied by the hosting framework.

use crate::params::JobParams;
use capstan_common_secret::SecretString;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Everything the framework hands a handler besides its parameters.
///
/// The context is owned by the framework and read-only from the handler's
/// perspective: secrets, environment values, outputs of upstream jobs, and
/// (when a hook is re-invoked after a failure) the original invocation
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
	secrets: HashMap<String, SecretString>,
	env: HashMap<String, String>,
	outputs: Map<String, Value>,
	params: Option<JobParams>,
}

impl ExecutionContext {
	/// Start building a context.
	pub fn builder() -> ExecutionContextBuilder {
		ExecutionContextBuilder::default()
	}

	/// Read a secret by name.
	pub fn secret(&self, name: &str) -> Option<&SecretString> {
		self.secrets.get(name)
	}

	/// Read an environment value by name.
	pub fn env_var(&self, name: &str) -> Option<&str> {
		self.env.get(name).map(String::as_str)
	}

	/// Outputs of upstream jobs in the same run.
	pub fn outputs(&self) -> &Map<String, Value> {
		&self.outputs
	}

	/// The original invocation parameters, when the framework re-invokes a
	/// hook with them stashed on the context instead of the hook bundle.
	pub fn params(&self) -> Option<&JobParams> {
		self.params.as_ref()
	}
}

/// Builder for [`ExecutionContext`]; the framework side of the contract.
#[derive(Debug, Default)]
pub struct ExecutionContextBuilder {
	secrets: HashMap<String, SecretString>,
	env: HashMap<String, String>,
	outputs: Map<String, Value>,
	params: Option<JobParams>,
}

impl ExecutionContextBuilder {
	/// Add a named secret.
	pub fn secret(mut self, name: impl Into<String>, value: impl Into<SecretString>) -> Self {
		self.secrets.insert(name.into(), value.into());
		self
	}

	/// Add an environment value.
	pub fn env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.env.insert(name.into(), value.into());
		self
	}

	/// Record an upstream job output.
	pub fn output(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.outputs.insert(name.into(), value.into());
		self
	}

	/// Stash the original invocation parameters on the context.
	pub fn original_params(mut self, params: JobParams) -> Self {
		self.params = Some(params);
		self
	}

	/// Finish building.
	pub fn build(self) -> ExecutionContext {
		ExecutionContext {
			secrets: self.secrets,
			env: self.env,
			outputs: self.outputs,
			params: self.params,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn secret_lookup_returns_wrapped_value() {
		let ctx = ExecutionContext::builder()
			.secret("OKTA_API_TOKEN", "00token")
			.build();

		let secret = ctx.secret("OKTA_API_TOKEN").unwrap();
		assert_eq!(secret.expose(), "00token");
		assert!(ctx.secret("OTHER").is_none());
	}

	#[test]
	fn secrets_do_not_leak_through_context_debug() {
		let ctx = ExecutionContext::builder()
			.secret("OKTA_API_TOKEN", "00-very-secret")
			.build();

		let debug = format!("{ctx:?}");
		assert!(!debug.contains("00-very-secret"));
	}

	#[test]
	fn env_and_outputs_round_trip() {
		let ctx = ExecutionContext::builder()
			.env_var("REGION", "emea")
			.output("previous", json!({"ok": true}))
			.build();

		assert_eq!(ctx.env_var("REGION"), Some("emea"));
		assert_eq!(ctx.outputs().get("previous"), Some(&json!({"ok": true})));
	}

	#[test]
	fn params_default_to_none() {
		let ctx = ExecutionContext::builder().build();
		assert!(ctx.params().is_none());
	}
}
