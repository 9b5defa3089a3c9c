use sha2::{Digest, Sha256};

use crate::session::SessionId;

/// Mints and checks per-action anti-forgery tokens.
pub trait TokenIssuer: Send + Sync {
    /// Token authorizing `intent` (e.g. `delete{id}`) for `session`.
    fn mint(&self, session: &SessionId, intent: &str) -> String;

    /// Whether `token` was minted for exactly this session and intent.
    fn verify(&self, session: &SessionId, intent: &str, token: &str) -> bool {
        constant_time_eq(self.mint(session, intent).as_bytes(), token.as_bytes())
    }
}

/// Stateless issuer: the token is a keyed SHA-256 digest of session and intent.
pub struct KeyedTokenIssuer {
    secret: Vec<u8>,
}

impl KeyedTokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenIssuer for KeyedTokenIssuer {
    fn mint(&self, session: &SessionId, intent: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update([0u8]);
        hasher.update(session.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(intent.as_bytes());

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
