// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flat parameter bundle passed into a job handler.

use crate::context::ExecutionContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The parameter bundle for a single job invocation.
///
/// Parameters arrive from the hosting framework as a flat JSON object.
/// Accessors are typed: a parameter that is absent or carries the wrong
/// JSON type reads as missing, which is what drives fail-fast validation
/// in handlers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParams {
	values: Map<String, Value>,
}

impl JobParams {
	/// Create an empty parameter bundle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a bundle from a JSON value. Returns `None` unless the value is
	/// a JSON object.
	pub fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Object(values) => Some(Self { values }),
			_ => None,
		}
	}

	/// Set a parameter, replacing any previous value under the same key.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.values.insert(key.into(), value.into());
		self
	}

	/// Raw access to a parameter value.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Read a parameter as a string.
	///
	/// Returns `None` when the key is absent or the value is not a JSON
	/// string.
	pub fn str_param(&self, key: &str) -> Option<&str> {
		self.values.get(key).and_then(Value::as_str)
	}

	/// Whether the bundle carries no parameters.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl From<Map<String, Value>> for JobParams {
	fn from(values: Map<String, Value>) -> Self {
		Self { values }
	}
}

/// Look up a string parameter in the hook parameters, falling back to the
/// original invocation parameters stashed on the context.
///
/// Frameworks differ on how they re-invoke the `error` and `halt` hooks:
/// some repeat the original parameters on the hook's own bundle, others
/// carry them on the context. Handlers must accept both shapes. An empty
/// string reads as absent; a blank id is never usable.
pub fn param_lookup<'a>(
	key: &str,
	params: &'a JobParams,
	ctx: &'a ExecutionContext,
) -> Option<&'a str> {
	params
		.str_param(key)
		.filter(|value| !value.is_empty())
		.or_else(|| {
			ctx.params()
				.and_then(|p| p.str_param(key))
				.filter(|value| !value.is_empty())
		})
}
