//! Bearer-token verification.
//!
//! Credential extraction lives in `middleware::auth`; this module only
//! compares tokens.

use subtle::ConstantTimeEq;

/// Authentication provider for a single static bearer token.
#[derive(Clone)]
pub struct AuthProvider {
    bearer_token: String,
}

impl AuthProvider {
    /// Creates a provider if a non-empty token is configured.
    pub fn new(token: Option<String>) -> Option<Self> {
        token
            .filter(|t| !t.is_empty())
            .map(|bearer_token| Self { bearer_token })
    }

    /// Check a bearer token.
    pub fn check_bearer(&self, token: &str) -> bool {
        ct_eq(token.as_bytes(), self.bearer_token.as_bytes())
    }
}

/// Constant-time comparison of two byte slices.
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_means_no_provider() {
        assert!(AuthProvider::new(None).is_none());
        assert!(AuthProvider::new(Some(String::new())).is_none());
    }

    #[test]
    fn checks_exact_token() {
        let auth = AuthProvider::new(Some("s3cret".into())).unwrap();
        assert!(auth.check_bearer("s3cret"));
        assert!(!auth.check_bearer("s3cre"));
        assert!(!auth.check_bearer("s3cret "));
        assert!(!auth.check_bearer(""));
    }
}
