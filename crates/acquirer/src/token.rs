//! Session cookie token minting for live-room requests.

use rand::RngExt;

/// Alphabet shared by the minted token values.
const BASE_CHARS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const MS_TOKEN_LEN: usize = 107;
const TTWID_LEN: usize = 32;

/// Mints the two short-lived cookie values (`msToken`, `ttwid`) attached to
/// live-room requests. Both are opaque to the engine.
pub trait TokenProvider: Send + Sync {
    fn mint(&self) -> (String, String);
}

/// Default provider minting locally generated random tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokens;

impl TokenProvider for RandomTokens {
    fn mint(&self) -> (String, String) {
        (random_token(MS_TOKEN_LEN), random_token(TTWID_LEN))
    }
}

fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE_CHARS[rng.random_range(0..BASE_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_have_expected_shape() {
        let (ms_token, ttwid) = RandomTokens.mint();
        assert_eq!(ms_token.len(), MS_TOKEN_LEN);
        assert_eq!(ttwid.len(), TTWID_LEN);
        assert!(ms_token.bytes().all(|b| BASE_CHARS.contains(&b)));
        assert!(ttwid.bytes().all(|b| BASE_CHARS.contains(&b)));
    }

    #[test]
    fn minted_tokens_differ_between_calls() {
        let (a, _) = RandomTokens.mint();
        let (b, _) = RandomTokens.mint();
        assert_ne!(a, b);
    }
}
