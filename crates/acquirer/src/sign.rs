//! Anti-bot request signing.
//!
//! The vendor API rejects unsigned requests; the signature is derived from
//! the urlencoded query string and appended as the `X-Bogus` parameter. The
//! engine treats the signer as an opaque service behind the [`Signer`] trait.

use md5::{Digest, Md5};

/// Produces an anti-bot signature token for an urlencoded query string.
///
/// Must be deterministic enough for the vendor to accept the request within
/// its short validity window; the engine only appends the returned token.
pub trait Signer: Send + Sync {
    fn sign(&self, query: &str) -> String;
}

const XBOGUS_ALPHABET: &[u8; 64] =
    b"Dkdpgh4ZKsQB80/Mfvw36XI1R25+WUAlEi7NLboqYTOPuzmFjJnryx9HVGcaStCe";
const STANDARD_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

// Precomputed: md5(decode(md5(""))) last 2 bytes.
const EMPTY_MD5_BYTES: [u8; 2] = [0x45, 0x3f];

const fn build_lookup() -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut i = 0;
    while i < 64 {
        table[STANDARD_ALPHABET[i] as usize] = XBOGUS_ALPHABET[i];
        i += 1;
    }
    table
}
const ALPHABET_LOOKUP: [u8; 128] = build_lookup();

/// X-Bogus signature generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct XBogus;

impl Signer for XBogus {
    fn sign(&self, query: &str) -> String {
        let digest = format!("{:x}", Md5::digest(query.as_bytes()));
        let mut stub = [0u8; 32];
        stub.copy_from_slice(digest.as_bytes());
        let token = generate_token(&stub, 0);
        // Token bytes come from XBOGUS_ALPHABET, all ASCII.
        String::from_utf8(token.to_vec()).unwrap_or_default()
    }
}

fn rc4_encrypt(key: u8, data: &mut [u8]) {
    let mut s: [u8; 256] = core::array::from_fn(|i| i as u8);
    let mut j: usize = 0;

    for i in 0..256 {
        j = (j + s[i] as usize + key as usize) % 256;
        s.swap(i, j);
    }

    let mut i: usize = 0;
    j = 0;
    for byte in data.iter_mut() {
        i = (i + 1) % 256;
        j = (j + s[i] as usize) % 256;
        s.swap(i, j);
        *byte ^= s[(s[i] as usize + s[j] as usize) % 256];
    }
}

fn encode_custom_base64(data: &[u8; 12], out: &mut [u8; 16]) {
    let mut i = 0;
    let mut o = 0;
    while i < 12 {
        let b0 = data[i] as usize;
        let b1 = data[i + 1] as usize;
        let b2 = data[i + 2] as usize;

        out[o] = ALPHABET_LOOKUP[STANDARD_ALPHABET[(b0 >> 2) & 0x3f] as usize];
        out[o + 1] = ALPHABET_LOOKUP[STANDARD_ALPHABET[((b0 << 4) | (b1 >> 4)) & 0x3f] as usize];
        out[o + 2] = ALPHABET_LOOKUP[STANDARD_ALPHABET[((b1 << 2) | (b2 >> 6)) & 0x3f] as usize];
        out[o + 3] = ALPHABET_LOOKUP[STANDARD_ALPHABET[b2 & 0x3f] as usize];

        i += 3;
        o += 4;
    }
}

fn hex_byte(h: u8, l: u8) -> u8 {
    let hi = if h >= b'a' { h - b'a' + 10 } else { h - b'0' };
    let lo = if l >= b'a' { l - b'a' + 10 } else { l - b'0' };
    (hi << 4) | lo
}

/// Last 2 bytes of md5(decode(hex_str)).
fn md5_last2(hex_str: &[u8; 32]) -> [u8; 2] {
    let mut bytes = [0u8; 16];
    for i in 0..16 {
        bytes[i] = hex_byte(hex_str[i * 2], hex_str[i * 2 + 1]);
    }
    let hash = Md5::digest(bytes);
    [hash[14], hash[15]]
}

/// Generate the 16-byte ASCII X-Bogus token from a 32-char md5 hex stub.
fn generate_token(stub: &[u8; 32], counter: u8) -> [u8; 16] {
    let random1 = rand::random::<u8>();
    let random2 = (rand::random::<u8>() as u16 * 255 / 256) as u8;

    // Header byte: version(1)<<6 | initialized(0)<<5 | (random1 & 0x1f)
    let header = 0x40 | (random1 & 0x1f);

    let md5_bytes = md5_last2(stub);
    let mut payload: [u8; 10] = [
        counter & 0x3f, // platform(0)<<6 | counter
        0,              // envcode >> 8
        1,              // envcode & 0xff
        0x0e,           // ubcode
        EMPTY_MD5_BYTES[0],
        EMPTY_MD5_BYTES[1],
        md5_bytes[0],
        md5_bytes[1],
        random2,
        0, // checksum placeholder
    ];

    payload[9] = payload[..9].iter().fold(0, |a, &x| a ^ x);

    rc4_encrypt(random2, &mut payload);

    let mut final_data: [u8; 12] = [0; 12];
    final_data[0] = header;
    final_data[1] = random2;
    final_data[2..].copy_from_slice(&payload);

    let mut result = [0u8; 16];
    encode_custom_base64(&final_data, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_last2_known_value() {
        let input = b"56a634b4228ef02b53388ada4e6f76c7";
        assert_eq!(md5_last2(input), [0x26, 0x54]);
    }

    #[test]
    fn empty_md5_constant_matches() {
        let empty_md5 = format!("{:x}", Md5::digest(b""));
        let mut stub = [0u8; 32];
        stub.copy_from_slice(empty_md5.as_bytes());
        assert_eq!(md5_last2(&stub), EMPTY_MD5_BYTES);
    }

    #[test]
    fn token_is_sixteen_alphabet_chars() {
        let token = XBogus.sign("aid=6383&count=35&max_cursor=0");
        assert_eq!(token.len(), 16);
        assert!(token.bytes().all(|b| XBOGUS_ALPHABET.contains(&b)));
    }
}
