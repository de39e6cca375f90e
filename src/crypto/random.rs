use getrandom::fill;

use crate::error::{KryptoError, Result};

/// Fill buffer with cryptographically secure random bytes
pub fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| KryptoError::RandomUnavailable)
}

/// `count` cryptographically secure random bytes
pub fn random_bytes(count: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; count];
    secure_random(&mut buf)?;
    Ok(buf)
}

/// Four random bytes read as a little-endian signed integer
pub fn random_int() -> Result<i32> {
    let mut buf = [0u8; 4];
    secure_random(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Generate a random array, used for salts and IVs
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    secure_random(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_has_requested_length() {
        assert_eq!(random_bytes(0).unwrap().len(), 0);
        assert_eq!(random_bytes(33).unwrap().len(), 33);
    }

    #[test]
    fn random_arrays_differ() {
        let a: [u8; 16] = random_array().unwrap();
        let b: [u8; 16] = random_array().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn random_ints_vary() {
        let values: std::collections::HashSet<i32> =
            (0..32).map(|_| random_int().unwrap()).collect();
        assert!(values.len() > 1);
    }
}
