// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret string wrapper that prevents accidental logging of sensitive values.
//!
//! [`SecretString`] wraps credentials like API tokens so that they:
//!
//! - Never appear in logs (redacted Debug/Display)
//! - Never serialize to plain text (redacted Serialize)
//! - Are zeroized from memory on drop
//! - Require an explicit `.expose()` call to access the inner value
//!
//! # Example
//!
//! ```
//! use capstan_common_secret::SecretString;
//!
//! let token = SecretString::new("00aBcDeF".to_string());
//!
//! assert_eq!(format!("{:?}", token), "SecretString(\"[REDACTED]\")");
//! assert_eq!(format!("{}", token), "[REDACTED]");
//! assert_eq!(token.expose(), "00aBcDeF");
//! ```
//!
//! When used with structured logging, `info!(token = %token, ...)` renders
//! through Display and `info!(?token, ...)` through Debug; both are redacted.

use std::fmt;
use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A sensitive string that must be explicitly exposed to be read.
///
/// Call sites opt in to seeing the value by calling [`SecretString::expose`],
/// which keeps secret access visible in code review.
pub struct SecretString {
	inner: String,
}

impl SecretString {
	/// Wrap the given value.
	pub fn new(inner: String) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	pub fn expose(&self) -> &str {
		&self.inner
	}

	/// Consume the wrapper and return the inner value.
	///
	/// Clones rather than moves so the original buffer is still zeroized
	/// when the wrapper drops.
	pub fn into_inner(self) -> String {
		self.inner.clone()
	}

	/// Whether the wrapped value is the empty string.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl Drop for SecretString {
	fn drop(&mut self) {
		self.inner.zeroize();
	}
}

impl Clone for SecretString {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl From<String> for SecretString {
	fn from(inner: String) -> Self {
		Self::new(inner)
	}
}

impl From<&str> for SecretString {
	fn from(inner: &str) -> Self {
		Self::new(inner.to_string())
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&REDACTED).finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for SecretString {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{SecretString, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	impl Serialize for SecretString {
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de> Deserialize<'de> for SecretString {
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = String::deserialize(deserializer)?;
			Ok(SecretString::new(inner))
		}
	}
}
