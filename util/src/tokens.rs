//! In-memory revocation list for JWT ids.
//!
//! Logout records the token's `jti` together with its expiry. Entries are
//! dropped once the token would have expired anyway, so the map stays small.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct RevokedTokens {
    inner: Arc<DashMap<String, i64>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `jti` as revoked until the unix timestamp `exp`.
    pub fn revoke(&self, jti: impl Into<String>, exp: i64) {
        let now = Utc::now().timestamp();
        self.inner.retain(|_, expiry| *expiry > now);
        self.inner.insert(jti.into(), exp);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.inner.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoke_then_check() {
        let revoked = RevokedTokens::new();
        let exp = Utc::now().timestamp() + 600;
        revoked.revoke("abc", exp);
        assert!(revoked.is_revoked("abc"));
        assert!(!revoked.is_revoked("xyz"));
    }

    #[test]
    fn expired_entries_are_purged_on_insert() {
        let revoked = RevokedTokens::new();
        revoked.revoke("old", Utc::now().timestamp() - 10);
        revoked.revoke("new", Utc::now().timestamp() + 600);
        assert!(!revoked.is_revoked("old"));
        assert_eq!(revoked.len(), 1);
    }
}
