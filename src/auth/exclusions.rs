// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path exclusion matching.
//!
//! Decides whether a request path requires authentication given a list of
//! exclusion rules. Comparison is insensitive to trailing slashes on both
//! the path and the rules, so `/status`, `/status/` and `/status//` are
//! equivalent. A rule ending in `*` is a prefix rule: the `*` is stripped
//! from the raw rule text and the normalized path is prefix-compared
//! against what remains.

/// Whether `path` requires authentication given `excluded_paths`.
///
/// An empty path or an empty exclusion list always requires auth.
pub fn requires_auth(path: &str, excluded_paths: &[String]) -> bool {
    if path.is_empty() || excluded_paths.is_empty() {
        return true;
    }

    let path = normalize(path);

    for excluded_path in excluded_paths {
        if let Some(prefix) = excluded_path.strip_suffix('*') {
            if path.starts_with(prefix) {
                return false;
            }
        } else if path == normalize(excluded_path) {
            return false;
        }
    }

    true
}

/// Normalize to exactly one trailing slash.
fn normalize(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}
