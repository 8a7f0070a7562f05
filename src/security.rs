use subtle::ConstantTimeEq;

/// Header carrying the shared secret on every protected route
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Allow/deny decision for a caller-presented API key.
///
/// The configured secret is fixed at construction. An empty secret denies
/// everything so a blank `API_KEY` can never open the gateway.
#[derive(Clone)]
pub struct CredentialGate {
    secret: String,
}

impl CredentialGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(key) if !self.secret.is_empty() => constant_time_compare(key, &self.secret),
            _ => false,
        }
    }
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGate").finish_non_exhaustive()
    }
}
