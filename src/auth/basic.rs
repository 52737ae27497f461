// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP Basic authentication.
//!
//! Resolves `Authorization: Basic <base64(email:password)>` against the
//! user directory. Each step of the chain returns `None` on failure and
//! the whole resolution short-circuits; a malformed header is
//! indistinguishable from a wrong password at the boundary.

use std::sync::Arc;

use axum::http::HeaderMap;
use base64ct::{Base64, Encoding};

use crate::directory::UserDirectory;
use crate::models::User;

use super::CredentialExtractor;

/// Basic-auth credential strategy.
pub struct BasicAuth {
    directory: Arc<dyn UserDirectory>,
    cookie_name: String,
}

impl BasicAuth {
    pub fn new(directory: Arc<dyn UserDirectory>, cookie_name: impl Into<String>) -> Self {
        Self {
            directory,
            cookie_name: cookie_name.into(),
        }
    }

    /// Token part of a `Basic` authorization header.
    ///
    /// The prefix check is exact: `"Basic "`, case-sensitive, one space.
    pub fn extract_header_token(header: &str) -> Option<&str> {
        header.strip_prefix("Basic ")
    }

    /// Decode the Base64 token to UTF-8 text.
    ///
    /// Malformed Base64 and non-UTF-8 payloads both yield `None`.
    pub fn decode_token(token: &str) -> Option<String> {
        let bytes = Base64::decode_vec(token).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Split decoded credentials into `(email, password)`.
    ///
    /// Splits on the first `:` only, so passwords may contain colons.
    pub fn split_credentials(decoded: &str) -> Option<(String, String)> {
        decoded
            .split_once(':')
            .map(|(email, password)| (email.to_string(), password.to_string()))
    }

    /// Resolve an email/password pair against the directory.
    ///
    /// Among users sharing the email, the first whose password check
    /// succeeds wins; an empty result or no match yields `None`.
    pub fn resolve_user(&self, email: &str, password: &str) -> Option<User> {
        self.directory
            .find_by_email(email)
            .into_iter()
            .find(|user| self.directory.check_password(user, password))
    }
}

impl CredentialExtractor for BasicAuth {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        let header = self.authorization_header(headers)?;
        let token = Self::extract_header_token(&header)?;
        let decoded = Self::decode_token(token)?;
        let (email, password) = Self::split_credentials(&decoded)?;
        self.resolve_user(&email, &password)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use chrono::Utc;

    use crate::directory::hash_password;

    use super::*;

    /// Directory stub holding a fixed set of users.
    struct StubDirectory {
        users: Vec<User>,
    }

    impl StubDirectory {
        fn with_user(email: &str, password: &str) -> Self {
            Self {
                users: vec![User {
                    id: "user_1".to_string(),
                    email: email.to_string(),
                    password_hash: hash_password(password),
                    first_name: None,
                    last_name: None,
                    created_at: Utc::now(),
                }],
            }
        }
    }

    impl UserDirectory for StubDirectory {
        fn find_by_email(&self, email: &str) -> Vec<User> {
            self.users
                .iter()
                .filter(|user| user.email == email)
                .cloned()
                .collect()
        }

        fn find_by_id(&self, id: &str) -> Option<User> {
            self.users.iter().find(|user| user.id == id).cloned()
        }

        fn check_password(&self, user: &User, plaintext: &str) -> bool {
            user.password_hash == hash_password(plaintext)
        }
    }

    fn basic_auth(email: &str, password: &str) -> BasicAuth {
        BasicAuth::new(
            Arc::new(StubDirectory::with_user(email, password)),
            "_my_session_id",
        )
    }

    fn basic_header(email: &str, password: &str) -> HeaderValue {
        let token = STANDARD.encode(format!("{email}:{password}"));
        HeaderValue::from_str(&format!("Basic {token}")).unwrap()
    }

    #[test]
    fn extract_header_token_requires_exact_basic_prefix() {
        assert_eq!(
            BasicAuth::extract_header_token("Basic QWxhZGRpbjpvcGVuc2VzYW1l"),
            Some("QWxhZGRpbjpvcGVuc2VzYW1l")
        );
        assert!(BasicAuth::extract_header_token("Bearer xyz").is_none());
        assert!(BasicAuth::extract_header_token("basic QWxhZGRpbg==").is_none());
        assert!(BasicAuth::extract_header_token("").is_none());
    }

    #[test]
    fn decode_token_round_trips_base64() {
        let token = STANDARD.encode("a:b");
        assert_eq!(BasicAuth::decode_token(&token).as_deref(), Some("a:b"));
    }

    #[test]
    fn decode_token_rejects_malformed_input() {
        assert!(BasicAuth::decode_token("not base64!!").is_none());
        // Valid Base64, invalid UTF-8 payload.
        let token = STANDARD.encode([0xffu8, 0xfe, 0xfd]);
        assert!(BasicAuth::decode_token(&token).is_none());
    }

    #[test]
    fn split_credentials_uses_first_colon_only() {
        assert_eq!(
            BasicAuth::split_credentials("user:pa:ss"),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
        assert!(BasicAuth::split_credentials("no separator").is_none());
    }

    #[test]
    fn current_user_resolves_valid_credentials() {
        let auth = basic_auth("ada@example.com", "secret");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            basic_header("ada@example.com", "secret"),
        );

        let user = auth.current_user(&headers).unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn current_user_accepts_password_with_colons() {
        let auth = basic_auth("ada@example.com", "pa:ss:word");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            basic_header("ada@example.com", "pa:ss:word"),
        );

        assert!(auth.current_user(&headers).is_some());
    }

    #[test]
    fn current_user_rejects_wrong_password_and_unknown_email() {
        let auth = basic_auth("ada@example.com", "secret");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            basic_header("ada@example.com", "wrong"),
        );
        assert!(auth.current_user(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            basic_header("nobody@example.com", "secret"),
        );
        assert!(auth.current_user(&headers).is_none());
    }

    #[test]
    fn current_user_rejects_missing_or_malformed_header() {
        let auth = basic_auth("ada@example.com", "secret");

        assert!(auth.current_user(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic ???"));
        assert!(auth.current_user(&headers).is_none());
    }
}
