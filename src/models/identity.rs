// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User identifiers at the two trust levels the API accepts.
//!
//! - [`UnverifiedUserId`]: a user id taken at face value from the request.
//! - [`VerifiedIdentity`]: a user id established by ID token verification.
//!
//! Both reduce to a [`UserId`], which is always non-empty.

use crate::error::AppError;
use serde::Serialize;
use std::fmt;

/// Opaque, non-empty user id used to scope every stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse a user id, rejecting empty values, surrounding whitespace and
    /// path separators. Ids are never normalized.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.trim() != raw || raw.contains('/') {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user id supplied by the caller and not authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedUserId(UserId);

impl UnverifiedUserId {
    /// Parse the `userId` request parameter; missing or empty is a 400.
    pub fn from_param(raw: Option<&str>) -> Result<Self, AppError> {
        raw.and_then(UserId::parse)
            .map(Self)
            .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))
    }

    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

/// A caller identity established by verifying a Firebase ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    user_id: UserId,
    email: Option<String>,
}

impl VerifiedIdentity {
    /// Only the token verifier constructs verified identities.
    pub(crate) fn new(user_id: UserId, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
