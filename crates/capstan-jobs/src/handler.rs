// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The lifecycle hook trait implemented by job handlers.

use crate::context::ExecutionContext;
use crate::params::JobParams;
use async_trait::async_trait;
use serde_json::Value;

/// A job handler: one unit of work plus its error and halt hooks.
///
/// Hook results cross the framework boundary as JSON values; handlers
/// serialize their own typed result structs. Errors cross it by propagating
/// out of the hook, never as partial success payloads.
#[async_trait]
pub trait JobHandler: Send + Sync {
	/// The error type this handler raises.
	type Error: std::error::Error + Send + Sync + 'static;

	/// Perform the work.
	async fn invoke(
		&self,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error>;

	/// Inspect an error raised by a prior [`invoke`](JobHandler::invoke).
	///
	/// Takes the failure by value so a non-recoverable error can be
	/// re-raised unchanged. Returning `Ok` tells the framework the handler
	/// recovered locally.
	async fn error(
		&self,
		error: Self::Error,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error>;

	/// Acknowledge an externally requested stop.
	async fn halt(
		&self,
		params: &JobParams,
		ctx: &ExecutionContext,
	) -> Result<Value, Self::Error>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::fmt;

	#[derive(Debug)]
	struct NoopError;

	impl fmt::Display for NoopError {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("noop failure")
		}
	}

	impl std::error::Error for NoopError {}

	struct EchoHandler;

	#[async_trait]
	impl JobHandler for EchoHandler {
		type Error = NoopError;

		async fn invoke(
			&self,
			params: &JobParams,
			_ctx: &ExecutionContext,
		) -> Result<Value, Self::Error> {
			Ok(json!({ "echo": params.str_param("message") }))
		}

		async fn error(
			&self,
			error: Self::Error,
			_params: &JobParams,
			_ctx: &ExecutionContext,
		) -> Result<Value, Self::Error> {
			Err(error)
		}

		async fn halt(
			&self,
			_params: &JobParams,
			_ctx: &ExecutionContext,
		) -> Result<Value, Self::Error> {
			Ok(json!({ "halted": true }))
		}
	}

	#[tokio::test]
	async fn hooks_are_object_safe_and_awaitable() {
		let handler: Box<dyn JobHandler<Error = NoopError>> = Box::new(EchoHandler);

		let mut params = JobParams::new();
		params.insert("message", "hi");
		let ctx = ExecutionContext::builder().build();

		let out = handler.invoke(&params, &ctx).await.unwrap();
		assert_eq!(out, json!({ "echo": "hi" }));

		let halted = handler.halt(&params, &ctx).await.unwrap();
		assert_eq!(halted, json!({ "halted": true }));

		let err = handler.error(NoopError, &params, &ctx).await;
		assert!(err.is_err());
	}
}
