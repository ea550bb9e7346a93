//! Request authentication
//!
//! API keys, basic, bearer, OAuth2 client credentials, session login and
//! fixed headers. Schemes that fetch a token from the server keep it in the
//! [`Authenticator`] until it expires or the server rejects it.

mod authenticator;
mod types;

pub use authenticator::{extract_path, Authenticator};
pub use types::{AuthConfig, IssuedToken, Location};
