// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections, one module per concern.

mod events;
mod http;
mod identity;
mod invites;
mod logging;
mod profile;
mod smtp;

pub use events::{EventsConfig, EventsConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use identity::{IdentityConfig, IdentityConfigLayer};
pub use invites::{EmailCollisionPolicy, InvitesConfig, InvitesConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use profile::{ProfileConfig, ProfileConfigLayer};
pub use smtp::{SmtpConfig, SmtpConfigLayer};
