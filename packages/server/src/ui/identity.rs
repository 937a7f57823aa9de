//! Identity source: the display name carried by the `auth` cookie.
//!
//! The login flow (outside this crate) stores the user's display name in the
//! `auth` cookie as standard base64. The relay only reads it; a missing or
//! malformed cookie means the participant is anonymous.

use axum_extra::extract::cookie::CookieJar;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::domain::UserName;

/// Name of the cookie holding the encoded display name
pub const AUTH_COOKIE: &str = "auth";

/// Resolve the display name from the request cookies
pub fn resolve_user_name(jar: &CookieJar) -> Option<UserName> {
    let cookie = jar.get(AUTH_COOKIE)?;
    decode_user_name(cookie.value())
}

/// Decode a cookie value into a display name
pub fn decode_user_name(value: &str) -> Option<UserName> {
    if value.is_empty() {
        return None;
    }

    let bytes = match STANDARD.decode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Ignoring undecodable auth cookie: {}", e);
            return None;
        }
    };
    let name = match String::from_utf8(bytes) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Ignoring auth cookie with non UTF-8 name: {}", e);
            return None;
        }
    };

    match UserName::new(name) {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::warn!("Ignoring auth cookie with invalid name: {}", e);
            None
        }
    }
}

/// Encode a display name the way the login flow stores it
pub fn encode_user_name(name: &UserName) -> String {
    STANDARD.encode(name.as_str())
}
