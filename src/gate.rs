//! Resolves a login name/password pair into an identity and its visibility scope.
//!
//! Regular office names are trusted as claimed. Only the reserved `admin`
//! name is checked, against whatever [`AdminCredential`] the gate was built with.

use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ADMIN_NAME: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Regular,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub role: Role,
}

/// Which records an identity may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Own(String),
    All,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn scope(&self) -> Scope {
        match self.role {
            Role::Admin => Scope::All,
            Role::Regular => Scope::Own(self.name.clone()),
        }
    }
}

pub trait AdminCredential: Send + Sync {
    fn verify(&self, password: &str) -> bool;
}

/// A single plaintext secret compared by equality.
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AdminCredential for SharedSecret {
    fn verify(&self, password: &str) -> bool {
        password == self.secret
    }
}

/// Owner key for a login name: trimmed and lowercased, so `Pachuca` and
/// `pachuca` own the same records.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Clone)]
pub struct Gate {
    admin: Arc<dyn AdminCredential>,
}

impl Gate {
    pub fn new(admin: impl AdminCredential + 'static) -> Self {
        Self {
            admin: Arc::new(admin),
        }
    }

    pub fn with_shared_secret(secret: impl Into<String>) -> Self {
        Self::new(SharedSecret::new(secret))
    }

    pub fn authenticate(&self, name: &str, password: &str) -> Result<Identity, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyIdentity);
        }

        let normalized = canonical_name(name);
        if normalized == ADMIN_NAME {
            if !self.admin.verify(password) {
                return Err(LedgerError::InvalidAdminPassword);
            }
            return Ok(Identity {
                name: ADMIN_NAME.to_string(),
                role: Role::Admin,
            });
        }

        Ok(Identity {
            name: normalized,
            role: Role::Regular,
        })
    }
}
