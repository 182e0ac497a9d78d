// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory mailer for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Mailer, SmtpError};

/// A sent message captured by [`MemoryMailer`].
#[derive(Debug, Clone)]
pub struct SentEmail {
	pub to: String,
	pub subject: String,
	pub body_html: String,
	pub body_text: String,
}

/// Mailer double that records messages instead of delivering them.
///
/// `fail_sends` makes every send fail, for exercising the 500 path.
#[derive(Default)]
pub struct MemoryMailer {
	sent: Mutex<Vec<SentEmail>>,
	fail_sends: bool,
}

impl MemoryMailer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing() -> Self {
		Self {
			sent: Mutex::new(Vec::new()),
			fail_sends: true,
		}
	}

	pub fn sent_emails(&self) -> Vec<SentEmail> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl Mailer for MemoryMailer {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		if self.fail_sends {
			return Err(SmtpError::Send("memory mailer configured to fail".into()));
		}
		self.sent.lock().unwrap().push(SentEmail {
			to: to.to_string(),
			subject: subject.to_string(),
			body_html: body_html.to_string(),
			body_text: body_text.to_string(),
		});
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn records_sent_messages() {
		let mailer = MemoryMailer::new();
		mailer
			.send_email("a@example.com", "Hi", "<p>Hi</p>", "Hi")
			.await
			.unwrap();

		let sent = mailer.sent_emails();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to, "a@example.com");
	}

	#[tokio::test]
	async fn failing_mailer_reports_send_error() {
		let mailer = MemoryMailer::failing();
		let result = mailer.send_email("a@example.com", "Hi", "", "").await;
		assert!(matches!(result, Err(SmtpError::Send(_))));
		assert!(mailer.sent_emails().is_empty());
	}
}
