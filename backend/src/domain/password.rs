//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Hashes are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>` with the
//! salt and derived key hex encoded. The iteration count travels with the
//! hash, so it can be raised later without invalidating existing accounts.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::domain::error::Error;

const ALGORITHM: &str = "pbkdf2_sha256";
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Hash a password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, Error> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let key = derive(password.as_bytes(), salt.as_bytes(), ITERATIONS)?;
    Ok(format!(
        "{ALGORITHM}${ITERATIONS}${salt}${}",
        hex::encode(key)
    ))
}

/// Verify a password against a stored hash. An unparseable stored hash is an
/// internal error, never a silent mismatch.
pub fn verify(password: &str, stored: &str) -> Result<bool, Error> {
    let mut parts = stored.split('$');
    let (algorithm, iterations, salt, expected) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) => {
            (algorithm, iterations, salt, expected)
        }
        _ => return Err(Error::internal("malformed password hash")),
    };
    if algorithm != ALGORITHM {
        return Err(Error::internal("unsupported password hash algorithm"));
    }
    let iterations: u32 = iterations
        .parse()
        .map_err(|_| Error::internal("malformed password hash iteration count"))?;
    let expected = hex::decode(expected).map_err(|_| Error::internal("malformed password hash"))?;
    let key = derive(password.as_bytes(), salt.as_bytes(), iterations)?;

    // Constant-time comparison via HMAC verify.
    let mut derived_mac = mac(b"password-compare")?;
    derived_mac.update(&key);
    let derived_tag = derived_mac.finalize().into_bytes();
    let mut expected_mac = mac(b"password-compare")?;
    expected_mac.update(&expected);
    Ok(expected_mac.verify_slice(&derived_tag).is_ok())
}

fn mac(key: &[u8]) -> Result<Hmac<Sha256>, Error> {
    Hmac::<Sha256>::new_from_slice(key).map_err(|_| Error::internal("hmac key setup failed"))
}

/// PBKDF2 with a single output block; SHA-256 yields 32 bytes, exactly our
/// key length.
fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; KEY_LEN], Error> {
    let mut block = {
        let mut prf = mac(password)?;
        prf.update(salt);
        prf.update(&1u32.to_be_bytes());
        prf.finalize().into_bytes()
    };
    let mut output = [0u8; KEY_LEN];
    output.copy_from_slice(&block);
    for _ in 1..iterations {
        let mut prf = mac(password)?;
        prf.update(&block);
        block = prf.finalize().into_bytes();
        for (acc, byte) in output.iter_mut().zip(block.iter()) {
            *acc ^= byte;
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn verify_helper_stays_usable_after_comparison() {
        // Both the derived and expected MACs are built from the same helper;
        // a second verification must work exactly like the first.
        let stored = hash("repeatable secret").expect("hashes");
        assert!(verify("repeatable secret", &stored).expect("first check"));
        assert!(verify("repeatable secret", &stored).expect("second check"));
    }

    #[rstest]
    fn hash_then_verify_round_trips() {
        let stored = hash("correct horse battery staple").expect("hashes");
        assert!(stored.starts_with("pbkdf2_sha256$100000$"));
        assert!(verify("correct horse battery staple", &stored).expect("verifies"));
        assert!(!verify("wrong password", &stored).expect("verifies"));
    }

    #[rstest]
    fn salting_makes_hashes_unique() {
        let first = hash("same input").expect("hashes");
        let second = hash("same input").expect("hashes");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("not-a-hash")]
    #[case("pbkdf2_sha256$abc$salt$hash")]
    #[case("md5$1000$salt$hash")]
    #[case("pbkdf2_sha256$100000$salt$nothex")]
    fn malformed_stored_hash_is_an_internal_error(#[case] stored: &str) {
        assert!(verify("anything", stored).is_err());
    }

    #[rstest]
    fn known_vector_matches() {
        // RFC 6070-style vector recomputed for HMAC-SHA256, 1 iteration.
        let key = derive(b"password", b"salt", 1).expect("derives");
        assert_eq!(
            hex::encode(key),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }
}
