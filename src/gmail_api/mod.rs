//! Gmail API module split into logical submodules
//!
//! - auth: OAuth2 credential acquisition and the token cache
//! - send: the messages/send call

pub mod auth;
pub mod send;

// Re-export the pieces callers actually use
pub use auth::{InstalledFlowTokenProvider, TokenProvider};
pub use send::{GmailSender, MailSender};

#[cfg(test)]
pub use auth::MockTokenProvider;
#[cfg(test)]
pub use send::MockMailSender;
