//! Stored credentials are `salt:digest` where the salt is 16 random
//! bytes and the digest is SHA-512 over the password followed by the
//! salt, both rendered as lowercase hex.

use rand::Rng;
use rs_sha512::{HasherContext, Sha512Hasher};
use std::fmt::Write as _;
use std::hash::Hasher;

pub fn hash(password: &str) -> String {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = to_hex(&salt_bytes);
    let digest = digest_hex(password, &salt);
    format!("{salt}:{digest}")
}

/// Never fails loudly: a stored value that does not parse simply does
/// not match any password.
pub fn verify(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once(':') else {
        return false;
    };
    let computed = digest_hex(password, salt);
    constant_time_eq(computed.as_bytes(), digest.as_bytes())
}

fn digest_hex(password: &str, salt: &str) -> String {
    let mut hasher = Sha512Hasher::default();
    hasher.write(password.as_bytes());
    hasher.write(salt.as_bytes());
    let _ = hasher.finish();
    let digest: [u8; 64] = HasherContext::finish(&mut hasher).into();
    to_hex(&digest)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut rendered, byte| {
            let _ = write!(rendered, "{byte:02x}");
            rendered
        },
    )
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
