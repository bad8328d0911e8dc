//! Outbound HTTP clients: push gateway, transactional mail, and the
//! third-party team platform (OAuth + API pulls).
//!
//! Every client implements a gateway trait from `huddle-core`, so
//! services and tests never depend on this crate directly.

pub mod local;
pub mod mail;
pub mod oauth;
pub mod platform;
pub mod push;

mod http;

pub use local::NoopLocalScheduler;
pub use mail::MailClient;
pub use oauth::{OAuthClient, PkcePair, TokenSet};
pub use platform::TeamPlatformClient;
pub use push::PushClient;
