// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed user repository.
//!
//! ## Storage Layout
//!
//! One JSON file per user:
//! ```text
//! {data_dir}/users/
//!   {user_id}.json
//! ```
//!
//! Records are loaded into memory at open and written through on every
//! mutation, so reads never touch the filesystem on the request path.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{User, UserPatch};

use super::{hash_password, UserDirectory};

/// Error type for user repository operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

/// File-backed user directory with an in-memory index.
pub struct FileUserDirectory {
    root: PathBuf,
    users: RwLock<HashMap<String, User>>,
}

impl FileUserDirectory {
    /// Open the directory rooted at `{data_dir}/users`, loading every
    /// existing record. Unreadable files are skipped with a warning rather
    /// than failing startup.
    pub fn open(data_dir: &Path) -> Result<Self, DirectoryError> {
        let root = data_dir.join("users");
        fs::create_dir_all(&root)?;

        let mut users = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_user(&path) {
                Ok(user) => {
                    users.insert(user.id.clone(), user);
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable user file {}: {e}", path.display());
                }
            }
        }

        tracing::info!("Loaded {} user(s) from {}", users.len(), root.display());

        Ok(Self {
            root,
            users: RwLock::new(users),
        })
    }

    fn read_user(path: &Path) -> Result<User, DirectoryError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{user_id}.json"))
    }

    fn write_user(&self, user: &User) -> Result<(), DirectoryError> {
        let json = serde_json::to_vec_pretty(user)?;
        fs::write(self.user_path(&user.id), json)?;
        Ok(())
    }

    /// Create a user from an e-mail and plaintext password.
    ///
    /// The e-mail must be unique; the password is stored as a digest.
    pub fn create(
        &self,
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<User, DirectoryError> {
        let mut users = self.users.write().expect("user index lock poisoned");

        if users.values().any(|user| user.email == email) {
            return Err(DirectoryError::AlreadyExists(email.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: hash_password(password),
            first_name,
            last_name,
            created_at: Utc::now(),
        };

        self.write_user(&user)?;
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Apply a typed field mask to a user. Returns the updated record, or
    /// `None` when the id is unknown.
    pub fn update(&self, user_id: &str, patch: UserPatch) -> Result<Option<User>, DirectoryError> {
        let mut users = self.users.write().expect("user index lock poisoned");

        let Some(user) = users.get_mut(user_id) else {
            return Ok(None);
        };

        if let Some(first_name) = patch.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = Some(last_name);
        }

        let updated = user.clone();
        self.write_user(&updated)?;
        Ok(Some(updated))
    }

    /// Remove a user and its file. Returns `false` when the id is unknown.
    pub fn remove(&self, user_id: &str) -> bool {
        let mut users = self.users.write().expect("user index lock poisoned");
        if users.remove(user_id).is_none() {
            return false;
        }
        if let Err(e) = fs::remove_file(self.user_path(user_id)) {
            tracing::warn!("Failed to remove user file for {user_id}: {e}");
        }
        true
    }

    /// All users, unordered.
    pub fn all(&self) -> Vec<User> {
        let users = self.users.read().expect("user index lock poisoned");
        users.values().cloned().collect()
    }

    /// Number of users in the directory.
    pub fn count(&self) -> usize {
        let users = self.users.read().expect("user index lock poisoned");
        users.len()
    }
}

impl UserDirectory for FileUserDirectory {
    fn find_by_email(&self, email: &str) -> Vec<User> {
        if email.is_empty() {
            return Vec::new();
        }
        let users = self.users.read().expect("user index lock poisoned");
        users
            .values()
            .filter(|user| user.email == email)
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Option<User> {
        if id.is_empty() {
            return None;
        }
        let users = self.users.read().expect("user index lock poisoned");
        users.get(id).cloned()
    }

    fn check_password(&self, user: &User, plaintext: &str) -> bool {
        user.password_hash == hash_password(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open_directory(dir: &TempDir) -> FileUserDirectory {
        FileUserDirectory::open(dir.path()).expect("Failed to open user directory")
    }

    #[test]
    fn create_and_find_by_email() {
        let dir = TempDir::new().unwrap();
        let directory = open_directory(&dir);

        let user = directory
            .create("ada@example.com", "secret", Some("Ada".into()), None)
            .unwrap();

        let found = directory.find_by_email("ada@example.com");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, user.id);
        assert!(directory.find_by_email("nobody@example.com").is_empty());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let directory = open_directory(&dir);

        directory.create("ada@example.com", "a", None, None).unwrap();
        let err = directory.create("ada@example.com", "b", None, None);
        assert!(matches!(err, Err(DirectoryError::AlreadyExists(_))));
        assert_eq!(directory.count(), 1);
    }

    #[test]
    fn check_password_compares_digests() {
        let dir = TempDir::new().unwrap();
        let directory = open_directory(&dir);

        let user = directory.create("ada@example.com", "secret", None, None).unwrap();
        assert!(directory.check_password(&user, "secret"));
        assert!(!directory.check_password(&user, "wrong"));
    }

    #[test]
    fn users_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let user_id = {
            let directory = open_directory(&dir);
            directory
                .create("ada@example.com", "secret", None, None)
                .unwrap()
                .id
        };

        let directory = open_directory(&dir);
        assert_eq!(directory.count(), 1);
        let user = directory.find_by_id(&user_id).unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn update_applies_only_masked_fields() {
        let dir = TempDir::new().unwrap();
        let directory = open_directory(&dir);

        let user = directory
            .create("ada@example.com", "secret", Some("Ada".into()), Some("L".into()))
            .unwrap();

        let updated = directory
            .update(
                &user.id,
                UserPatch {
                    first_name: None,
                    last_name: Some("Lovelace".into()),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(updated.email, "ada@example.com");

        assert!(directory.update("missing", UserPatch::default()).unwrap().is_none());
    }

    #[test]
    fn remove_deletes_record_and_file() {
        let dir = TempDir::new().unwrap();
        let directory = open_directory(&dir);

        let user = directory.create("ada@example.com", "secret", None, None).unwrap();
        assert!(directory.remove(&user.id));
        assert!(!directory.remove(&user.id));
        assert!(directory.find_by_id(&user.id).is_none());
        assert!(!dir.path().join("users").join(format!("{}.json", user.id)).exists());
    }
}
