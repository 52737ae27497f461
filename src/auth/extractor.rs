// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the gate-resolved user.
//!
//! Use the `CurrentUser` extractor in handlers that care who is calling:
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is Option<User>: None on excluded/pass-through paths
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::User;

/// The user the auth gate resolved for this request, if any.
///
/// `None` on pass-through requests (auth disabled or excluded path);
/// rejected requests never reach a handler in the first place.
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<User>().cloned()))
    }
}
