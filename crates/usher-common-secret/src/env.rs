// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment helpers for loading secrets with `*_FILE` indirection.

use crate::SecretString;

/// Errors from [`load_secret_env`].
#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	/// Both `VAR` and `VAR_FILE` are set; the intent is ambiguous.
	#[error("both {var} and {var}_FILE are set; set exactly one")]
	Ambiguous { var: String },

	/// `VAR_FILE` points at a file that could not be read.
	#[error("failed to read secret file {path} (from {var}_FILE): {source}")]
	FileRead {
		var: String,
		path: String,
		#[source]
		source: std::io::Error,
	},
}

/// Load an optional secret from the environment.
///
/// Checks `VAR` first, then `VAR_FILE` (the file's contents, trailing
/// newline trimmed). Unset or empty means `Ok(None)`. Setting both is an
/// error rather than a silent precedence choice.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let direct = std::env::var(var).ok().filter(|v| !v.is_empty());
	let file_var = format!("{var}_FILE");
	let path = std::env::var(&file_var).ok().filter(|v| !v.is_empty());

	match (direct, path) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			var: var.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let contents =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					var: var.to_string(),
					path: path.clone(),
					source,
				})?;
			tracing::debug!(var, path = %path, "loaded secret from file");
			let trimmed = contents.trim_end_matches(['\r', '\n']).to_string();
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(trimmed)))
			}
		}
		(None, None) => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	// Env vars are process-global; serialize tests that touch them.
	static ENV_MUTEX: Mutex<()> = Mutex::new(());

	#[test]
	fn unset_returns_none() {
		let _guard = ENV_MUTEX.lock().unwrap();
		std::env::remove_var("USHER_TEST_SECRET_UNSET");
		std::env::remove_var("USHER_TEST_SECRET_UNSET_FILE");
		assert!(load_secret_env("USHER_TEST_SECRET_UNSET")
			.unwrap()
			.is_none());
	}

	#[test]
	fn direct_value_wins() {
		let _guard = ENV_MUTEX.lock().unwrap();
		std::env::set_var("USHER_TEST_SECRET_DIRECT", "s3cret");
		std::env::remove_var("USHER_TEST_SECRET_DIRECT_FILE");
		let secret = load_secret_env("USHER_TEST_SECRET_DIRECT").unwrap().unwrap();
		assert_eq!(secret.expose(), "s3cret");
		std::env::remove_var("USHER_TEST_SECRET_DIRECT");
	}

	#[test]
	fn empty_value_is_none() {
		let _guard = ENV_MUTEX.lock().unwrap();
		std::env::set_var("USHER_TEST_SECRET_EMPTY", "");
		std::env::remove_var("USHER_TEST_SECRET_EMPTY_FILE");
		assert!(load_secret_env("USHER_TEST_SECRET_EMPTY")
			.unwrap()
			.is_none());
		std::env::remove_var("USHER_TEST_SECRET_EMPTY");
	}

	#[test]
	fn file_value_is_read_and_trimmed() {
		let _guard = ENV_MUTEX.lock().unwrap();
		let dir = std::env::temp_dir();
		let path = dir.join("usher-secret-env-test");
		std::fs::write(&path, "from-file\n").unwrap();
		std::env::remove_var("USHER_TEST_SECRET_FILE");
		std::env::set_var("USHER_TEST_SECRET_FILE_FILE", &path);
		let secret = load_secret_env("USHER_TEST_SECRET_FILE").unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");
		std::env::remove_var("USHER_TEST_SECRET_FILE_FILE");
		std::fs::remove_file(&path).ok();
	}

	#[test]
	fn both_set_is_an_error() {
		let _guard = ENV_MUTEX.lock().unwrap();
		std::env::set_var("USHER_TEST_SECRET_BOTH", "a");
		std::env::set_var("USHER_TEST_SECRET_BOTH_FILE", "/nonexistent");
		let err = load_secret_env("USHER_TEST_SECRET_BOTH").unwrap_err();
		assert!(err.to_string().contains("exactly one"));
		std::env::remove_var("USHER_TEST_SECRET_BOTH");
		std::env::remove_var("USHER_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn missing_file_is_an_error() {
		let _guard = ENV_MUTEX.lock().unwrap();
		std::env::remove_var("USHER_TEST_SECRET_NOFILE");
		std::env::set_var(
			"USHER_TEST_SECRET_NOFILE_FILE",
			"/nonexistent/usher-secret",
		);
		assert!(load_secret_env("USHER_TEST_SECRET_NOFILE").is_err());
		std::env::remove_var("USHER_TEST_SECRET_NOFILE_FILE");
	}
}
