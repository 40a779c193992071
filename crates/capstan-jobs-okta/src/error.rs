// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the group assignment handler.

use thiserror::Error;

/// Errors raised by the group assignment handler and its Okta client.
#[derive(Debug, Error)]
pub enum AssignmentError {
	/// A required parameter was absent or not a string.
	#[error("Invalid or missing {0} parameter")]
	InvalidParameter(&'static str),

	/// A required secret was absent or empty.
	#[error("Missing required secret: {0}")]
	MissingSecret(&'static str),

	/// The supplied Okta domain does not form a valid base URL.
	#[error("invalid Okta domain: {0}")]
	InvalidDomain(String),

	/// Okta returned a non-success response. The message is the provider's
	/// `errorSummary` when one could be parsed out of the body.
	#[error("{message}")]
	Provider { status: u16, message: String },

	/// The request could not be sent or no response was obtained.
	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// A hook result could not be serialized for the framework.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AssignmentError {
	/// The HTTP status attached to a provider rejection.
	pub fn status(&self) -> Option<u16> {
		match self {
			AssignmentError::Provider { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Whether this failure is a provider rate limit.
	///
	/// Classification is a case-sensitive substring match on the rendered
	/// message. No status code is available on errors that have crossed the
	/// framework boundary, so the message text is the contract.
	pub fn is_rate_limit(&self) -> bool {
		self.to_string().contains("rate limit")
	}
}
