use crate::Result;
use hmac::{Hmac, Mac};
use sha3::Sha3_256;

type HmacSha3_256 = Hmac<Sha3_256>;

/// Trait for keyed commitment schemes
pub trait CommitmentScheme {
    fn digest(key: &[u8], message: &[u8]) -> Result<Vec<u8>>;
    fn verify(key: &[u8], message: &[u8], digest: &[u8]) -> Result<bool>;
}

/// HMAC over SHA3-256
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha3;

impl CommitmentScheme for HmacSha3 {
    fn digest(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        let mut mac = <HmacSha3_256 as Mac>::new_from_slice(key)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(key: &[u8], message: &[u8], digest: &[u8]) -> Result<bool> {
        let mut mac = <HmacSha3_256 as Mac>::new_from_slice(key)?;
        mac.update(message);
        // constant time comparison
        Ok(mac.verify_slice(digest).is_ok())
    }
}
