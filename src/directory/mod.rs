// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Directory Module
//!
//! The directory is the collaborator that owns user records and password
//! checks. The auth engine only consumes the [`UserDirectory`] trait; the
//! production implementation is the file-backed [`FileUserDirectory`].

pub mod file;

use sha2::{Digest, Sha256};

use crate::models::User;

pub use file::{DirectoryError, FileUserDirectory};

/// Read-side interface the auth engine resolves credentials against.
///
/// Lookup failures never propagate: an erroring backend behaves like an
/// empty one, and the caller treats the result as "no user".
pub trait UserDirectory: Send + Sync {
    /// All users with the given e-mail. Errors map to an empty list.
    fn find_by_email(&self, email: &str) -> Vec<User>;

    /// The user with the given id, if any.
    fn find_by_id(&self, id: &str) -> Option<User>;

    /// Whether `plaintext` matches the user's stored password digest.
    fn check_password(&self, user: &User, plaintext: &str) -> bool;
}

/// Lowercase-hex SHA-256 digest of a plaintext password.
///
/// The directory stores and compares digests only; plaintext never lands
/// on disk.
pub fn hash_password(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_password_is_lowercase_hex_sha256() {
        // sha256("password")
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn hash_password_differs_per_input() {
        assert_ne!(hash_password("a"), hash_password("b"));
    }
}
