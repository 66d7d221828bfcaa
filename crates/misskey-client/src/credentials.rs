//! Access token storage.
//!
//! The store itself never performs I/O. Client handles verify a candidate
//! token against `i` first and only then call [`CredentialStore::install`],
//! so a rejected, failed or cancelled verification leaves the previous token
//! in place.

use std::fmt;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Endpoint used to verify a token.
pub(crate) const VERIFY_ENDPOINT: &str = "i";

/// Holds the optional access token for one client handle.
#[derive(Default)]
pub struct CredentialStore {
    token: RwLock<Option<String>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.token.read().is_some()
    }

    /// Replace the token. Callers must have verified it already.
    pub(crate) fn install(&self, token: String) {
        *self.token.write() = Some(token);
    }

    /// Forget the token; later calls are anonymous.
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token", &self.token.read().as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Map the outcome of a verification call.
///
/// 401/403 mean the token was rejected; other failures pass through as-is.
pub(crate) fn check_verification<T>(outcome: Result<T>) -> Result<T> {
    match outcome {
        Err(Error::Api(e)) if e.status == 401 || e.status == 403 => {
            tracing::warn!(status = e.status, code = %e.code, "Token rejected");
            Err(Error::AuthorizationFailed {
                status: e.status,
                message: e.message,
            })
        }
        other => other,
    }
}

/// Reject tokens that cannot possibly be valid before going to the network.
pub(crate) fn validate_shape(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(Error::AuthorizationFailed {
            status: 0,
            message: "token is empty".to_string(),
        });
    }
    Ok(())
}
