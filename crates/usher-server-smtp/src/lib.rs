// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP email client for Usher.
//!
//! This crate provides the [`Mailer`] trait the server sends invitation
//! email through, plus the production [`SmtpClient`] implementation built on
//! [`lettre`]. It integrates with [`usher_common_secret`] to ensure
//! passwords are never logged.
//!
//! # Features
//!
//! - Async email sending using [`lettre`]
//! - TLS support (STARTTLS)
//! - Optional authentication
//! - Multipart emails (HTML + plain text)
//! - Secure password handling via [`SecretString`]
//!
//! # Example
//!
//! ```no_run
//! use usher_server_smtp::{Mailer, SmtpClient, SmtpConfig};
//! use usher_common_secret::SecretString;
//!
//! # async fn example() -> Result<(), usher_server_smtp::SmtpError> {
//! let config = SmtpConfig {
//!     host: "smtp.example.com".to_string(),
//!     port: 587,
//!     username: Some("user@example.com".to_string()),
//!     password: Some(SecretString::new("password".to_string())),
//!     from_address: "noreply@example.com".to_string(),
//!     from_name: "Usher".to_string(),
//!     use_tls: true,
//! };
//!
//! let client = SmtpClient::new(config)?;
//! client.send_email(
//!     "recipient@example.com",
//!     "Hello",
//!     "<h1>Hello World</h1>",
//!     "Hello World",
//! ).await?;
//! # Ok(())
//! # }
//! ```

pub mod testing;

use async_trait::async_trait;
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::env;
use usher_common_secret::SecretString;

/// Errors that can occur during SMTP operations.
#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	/// Failed to connect to the SMTP server.
	#[error("connection failed: {0}")]
	Connection(String),

	/// Authentication with the SMTP server failed.
	#[error("authentication failed: {0}")]
	Auth(String),

	/// Failed to send an email message.
	#[error("send failed: {0}")]
	Send(String),

	/// Invalid configuration (missing required fields, invalid values).
	#[error("invalid configuration: {0}")]
	Config(String),

	/// Invalid email address format.
	#[error("invalid email address: {0}")]
	Address(String),
}

/// Outbound email capability.
///
/// Handlers hold a `dyn Mailer` so tests can swap in an in-memory double;
/// the contract is exactly "send one multipart message".
#[async_trait]
pub trait Mailer: Send + Sync {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError>;
}

/// Configuration for the SMTP client.
///
/// # Security
///
/// The `password` field uses [`SecretString`] to ensure passwords are:
/// - Never logged (Debug/Display are redacted)
/// - Zeroized from memory on drop
/// - Never serialized to plain text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	/// SMTP server hostname (e.g., "smtp.gmail.com").
	pub host: String,

	/// SMTP server port. Common values: 25 (unencrypted), 465 (TLS), 587 (STARTTLS).
	pub port: u16,

	/// Optional username for SMTP authentication.
	pub username: Option<String>,

	/// Optional password for SMTP authentication.
	/// Wrapped in [`SecretString`] to prevent accidental logging.
	pub password: Option<SecretString>,

	/// Email address to send from (e.g., "noreply@example.com").
	pub from_address: String,

	/// Display name for the sender (e.g., "Usher Onboarding").
	pub from_name: String,

	/// Whether to use STARTTLS for the connection. Defaults to `true`.
	#[serde(default = "default_use_tls")]
	pub use_tls: bool,
}

fn default_use_tls() -> bool {
	true
}

impl SmtpConfig {
	/// Load SMTP configuration from environment variables.
	///
	/// # Environment Variables
	///
	/// - `USHER_SERVER_SMTP_HOST` (required): SMTP server hostname
	/// - `USHER_SERVER_SMTP_PORT` (optional, default: 587): SMTP server port
	/// - `USHER_SERVER_SMTP_USERNAME` (optional): Authentication username
	/// - `USHER_SERVER_SMTP_PASSWORD` (optional): Authentication password
	/// - `USHER_SERVER_SMTP_FROM_ADDRESS` (required): Sender email address
	/// - `USHER_SERVER_SMTP_FROM_NAME` (optional, default: "Usher"): Sender display name
	/// - `USHER_SERVER_SMTP_USE_TLS` (optional, default: true): Enable STARTTLS
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Config`] if required variables are missing or invalid.
	pub fn from_env() -> Result<Self, SmtpError> {
		let host = env::var("USHER_SERVER_SMTP_HOST")
			.map_err(|_| SmtpError::Config("USHER_SERVER_SMTP_HOST is required".into()))?;

		let port = env::var("USHER_SERVER_SMTP_PORT")
			.unwrap_or_else(|_| "587".into())
			.parse()
			.map_err(|_| {
				SmtpError::Config("USHER_SERVER_SMTP_PORT must be a valid port number".into())
			})?;

		let username = env::var("USHER_SERVER_SMTP_USERNAME").ok();
		let password = env::var("USHER_SERVER_SMTP_PASSWORD")
			.ok()
			.map(SecretString::new);

		let from_address = env::var("USHER_SERVER_SMTP_FROM_ADDRESS")
			.map_err(|_| SmtpError::Config("USHER_SERVER_SMTP_FROM_ADDRESS is required".into()))?;

		let from_name = env::var("USHER_SERVER_SMTP_FROM_NAME").unwrap_or_else(|_| "Usher".into());

		let use_tls = env::var("USHER_SERVER_SMTP_USE_TLS")
			.map(|v| v.to_lowercase() != "false" && v != "0")
			.unwrap_or(true);

		Ok(Self {
			host,
			port,
			username,
			password,
			from_address,
			from_name,
			use_tls,
		})
	}
}

/// Async SMTP client for sending emails.
///
/// Maintains a connection pool internally via [`lettre`]; the actual
/// connection is made lazily when sending.
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Create a new SMTP client from the given configuration.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the from address is invalid.
	/// Returns [`SmtpError::Connection`] if the transport cannot be built.
	#[tracing::instrument(
        name = "smtp_client_new",
        skip(config),
        fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
    )]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (config.username, config.password) {
			let credentials = Credentials::new(username, password.into_inner());
			builder = builder.credentials(credentials);
		}

		let transport = builder.build();

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport,
			from_mailbox,
		})
	}

	/// Check if the SMTP server is reachable and responding.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Connection`] if the server is unreachable.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		tracing::debug!("checking SMTP server health");
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		tracing::debug!("SMTP server is healthy");
		Ok(())
	}
}

#[async_trait]
impl Mailer for SmtpClient {
	/// Send a multipart email with both HTML and plain text versions.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the recipient address is invalid.
	/// Returns [`SmtpError::Send`] if the email fails to send.
	#[tracing::instrument(
        name = "smtp_send_email",
        skip(self, body_html, body_text),
        fields(to = %to, subject = %subject)
    )]
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

		tracing::debug!("building email message");

		let message = Message::builder()
			.from(self.from_mailbox.clone())
			.to(to_mailbox)
			.subject(subject)
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(body_text.to_string()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(body_html.to_string()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))?;

		tracing::debug!("sending email");

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent successfully");

		Ok(())
	}
}

/// Validate an email address format.
///
/// Uses [`lettre`]'s [`Mailbox`] parser to check if an email address is
/// valid. This validates the format, not whether the address exists.
///
/// # Example
///
/// ```
/// use usher_server_smtp::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("User Name <user@example.com>"));
/// assert!(!is_valid_email("not-an-email"));
/// assert!(!is_valid_email(""));
/// ```
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}
