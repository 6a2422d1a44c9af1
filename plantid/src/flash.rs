//! One-shot flash messages carried in a cookie across the redirect back to the form.
//!
//! A failed upload sets the cookie (see [`crate::errors::Error`]'s `IntoResponse`), the next
//! `GET /` reads it through the [`Flash`] extractor and clears it in the same response, so each
//! message is rendered exactly once. The message is base64url-encoded since it may contain
//! arbitrary upstream response text.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use std::convert::Infallible;
use tracing::trace;

pub const FLASH_COOKIE: &str = "plantid_flash";

/// Flash cookies only need to survive a single redirect
const FLASH_MAX_AGE_SECS: u64 = 300;

/// Longest message kept, in bytes. Browsers drop cookies over 4KB and base64 grows text by 4/3.
const MAX_MESSAGE_BYTES: usize = 2048;

/// Build a `Set-Cookie` value carrying `message`.
///
/// Messages over [`MAX_MESSAGE_BYTES`] are cut at a char boundary and end with `...`.
pub fn set_cookie(message: &str) -> String {
    let message = if message.len() > MAX_MESSAGE_BYTES {
        let mut cut = MAX_MESSAGE_BYTES;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &message[..cut])
    } else {
        message.to_string()
    };

    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        FLASH_COOKIE,
        URL_SAFE_NO_PAD.encode(message),
        FLASH_MAX_AGE_SECS
    )
}

/// Build a `Set-Cookie` value that removes a pending flash message
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Whether a `Cookie` header value names the flash cookie, whatever its value
pub fn has_cookie(header: &str) -> bool {
    header
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .any(|(name, value)| name == FLASH_COOKIE && !value.is_empty())
}

/// Find and decode the flash message in a `Cookie` (or `Set-Cookie`) header value
pub fn read_cookie(header: &str) -> Option<String> {
    for cookie in header.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name == FLASH_COOKIE
            && !value.is_empty()
        {
            let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
            return String::from_utf8(bytes).ok();
        }
    }
    None
}

/// The pending flash message, if the request carried one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    message: Option<String>,
    cookie_sent: bool,
}

impl Flash {
    pub fn into_messages(self) -> Vec<String> {
        self.message.into_iter().collect()
    }

    /// Whether the request carried a flash cookie, even one that failed to decode
    pub fn needs_clearing(&self) -> bool {
        self.cookie_sent
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers: Vec<&str> = parts
            .headers
            .get_all(axum::http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        let cookie_sent = headers.iter().any(|header| has_cookie(header));
        let message = headers.into_iter().find_map(read_cookie);

        match &message {
            Some(message) => trace!("Found pending flash message: {}", message),
            None if cookie_sent => trace!("Discarding unreadable flash cookie"),
            None => {}
        }

        Ok(Flash { message, cookie_sent })
    }
}
