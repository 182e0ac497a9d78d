// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Invitation email rendering.

/// Subject line of the invitation email.
pub const INVITE_SUBJECT: &str = "You've been invited";

/// A rendered invitation email.
#[derive(Debug, Clone)]
pub struct InviteEmail {
	pub subject: String,
	pub body_html: String,
	pub body_text: String,
}

/// Render the invitation email around the acceptance link.
pub fn render_invite_email(accept_link: &str) -> InviteEmail {
	InviteEmail {
		subject: INVITE_SUBJECT.to_string(),
		body_html: format!(
			"<p>Click <a href=\"{accept_link}\">here</a> to create your account: \
			 {accept_link}</p>"
		),
		body_text: format!("Click here to create your account: {accept_link}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn both_bodies_contain_the_link() {
		let link = "https://app.example.com/accept-invite/-Kxyz/tok";
		let email = render_invite_email(link);
		assert_eq!(email.subject, "You've been invited");
		assert!(email.body_text.contains(link));
		assert!(email.body_html.contains(link));
		assert!(email.body_text.starts_with("Click here to create your account"));
	}
}
