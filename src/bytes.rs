//! Byte-array helpers shared by the primitives.

use crate::error::{KryptoError, Result};

/// Structural equality. Buffers of different length never match.
pub fn compare(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// XORs `b` into `a` in place.
///
/// # Errors
///
/// Returns [`KryptoError::LengthMismatch`] if the lengths differ; `a` is
/// left untouched in that case.
pub fn xor(a: &mut [u8], b: &[u8]) -> Result<()> {
    if a.len() != b.len() {
        return Err(KryptoError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    a.iter_mut().zip(b).for_each(|(x, y)| *x ^= y);
    Ok(())
}

/// Concatenates all parts, in order, into a new buffer.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(len);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Reverses the byte order in place and hands the buffer back.
pub fn reverse(a: &mut [u8]) -> &mut [u8] {
    a.reverse();
    a
}

/// Parses a contiguous hex string such as `"0a1bff"`.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        return Err(KryptoError::InvalidHex(
            "hex string length must be even".to_string(),
        ));
    }
    hex::decode(s).map_err(|e| KryptoError::InvalidHex(e.to_string()))
}

/// Parses a delimited hex string such as `"0a 1b ff"`; each token is one byte.
pub fn hex_to_bytes_delimited(s: &str, delim: char) -> Result<Vec<u8>> {
    s.split(delim)
        .map(|token| {
            if !(1..=2).contains(&token.len()) || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(KryptoError::InvalidHex(format!(
                    "'{token}' is not one or two hex digits"
                )));
            }
            u8::from_str_radix(token, 16)
                .map_err(|e| KryptoError::InvalidHex(format!("'{token}': {e}")))
        })
        .collect()
}

/// Whether [`hex_to_bytes`] accepts `s`.
pub fn is_valid_hex(s: &str) -> bool {
    hex_to_bytes(s).is_ok()
}

/// Whether [`hex_to_bytes_delimited`] accepts `s`.
pub fn is_valid_hex_delimited(s: &str, delim: char) -> bool {
    hex_to_bytes_delimited(s, delim).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_matches_equal_buffers() {
        assert!(compare(b"abc", b"abc"));
        assert!(compare(&[], &[]));
    }

    #[test]
    fn compare_rejects_different_content_or_length() {
        assert!(!compare(b"abc", b"abd"));
        assert!(!compare(b"abc", b"ab"));
        assert!(!compare(&[], b"a"));
    }

    #[test]
    fn xor_in_place() {
        let mut a = vec![0xffu8, 0x00, 0x0f];
        xor(&mut a, &[0x0f, 0xf0, 0x0f]).unwrap();
        assert_eq!(a, vec![0xf0, 0xf0, 0x00]);
    }

    #[test]
    fn xor_length_mismatch_fails() {
        let mut a = vec![1u8, 2, 3];
        match xor(&mut a, &[1, 2]) {
            Err(KryptoError::LengthMismatch { left, right }) => {
                assert_eq!((left, right), (3, 2));
            }
            other => panic!("expected LengthMismatch, got: {other:?}"),
        }
        assert_eq!(a, vec![1, 2, 3]);
    }

    #[test]
    fn concat_keeps_order() {
        assert_eq!(concat(&[b"ab", b"", b"cd", b"e"]), b"abcde".to_vec());
        assert!(concat(&[]).is_empty());
    }

    #[test]
    fn reverse_in_place() {
        let mut a = [1u8, 2, 3, 4];
        assert_eq!(reverse(&mut a), &[4, 3, 2, 1]);
        assert_eq!(a, [4, 3, 2, 1]);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_bytes("0aFF10").unwrap(), vec![0x0a, 0xff, 0x10]);
        assert!(hex_to_bytes("abc").is_err());
        assert!(hex_to_bytes("zz").is_err());
        assert!(hex_to_bytes("").unwrap().is_empty());
    }

    #[test]
    fn delimited_hex_parsing() {
        assert_eq!(
            hex_to_bytes_delimited("0c 60 c8", ' ').unwrap(),
            vec![0x0c, 0x60, 0xc8]
        );
        assert_eq!(hex_to_bytes_delimited("a:b", ':').unwrap(), vec![0x0a, 0x0b]);
        assert!(!is_valid_hex_delimited("0c 6g", ' '));
        assert!(!is_valid_hex_delimited("100", ' '));
        assert!(is_valid_hex("deadbeef"));
    }

    #[test]
    fn delimited_hex_rejects_signs_and_empty_tokens() {
        for input in ["+a 0b", "-1", "0b +f", "0a  0b", ""] {
            assert!(
                matches!(hex_to_bytes_delimited(input, ' '), Err(KryptoError::InvalidHex(_))),
                "{input:?}"
            );
            assert!(!is_valid_hex_delimited(input, ' '));
        }
    }
}
