//! Known-answer tests that can be run against the built library.

use tracing::debug;

use crate::bytes::hex_to_bytes;
use crate::crypto::{Padding, aes128_cbc_encrypt, cmac_aes128, hmac_sha1, pbkdf2, wpa_psk};
use crate::error::{KryptoError, Result};

fn check(name: &str, actual: &[u8], expected_hex: &str) -> Result<()> {
    let expected = hex_to_bytes(expected_hex)?;
    if actual != expected.as_slice() {
        return Err(KryptoError::SelfTestFailed(name.to_string()));
    }
    debug!(name, "self-test passed");
    Ok(())
}

/// HMAC-SHA1, RFC 2202 section 3.
pub fn hmac_sha1_vectors() -> Result<()> {
    let aa80 = [0xaau8; 80];
    let cases: [(&str, &[u8], &[u8], &str); 7] = [
        ("hmac-sha1 #1", &[0x0b; 20], b"Hi There", "b617318655057264e28bc0b6fb378c8ef146be00"),
        ("hmac-sha1 #2", b"Jefe", b"what do ya want for nothing?", "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"),
        ("hmac-sha1 #3", &[0xaa; 20], &[0xdd; 50], "125d7342b9ac11cd91a39af48aa17b4f63f175d3"),
        (
            "hmac-sha1 #4",
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25],
            &[0xcd; 50],
            "4c9007f4026250c6bc8414f9bf50c86c2d7235da",
        ),
        ("hmac-sha1 #5", &[0x0c; 20], b"Test With Truncation", "4c1a03424b55e07fe7f27be1d58bb9324a9a5a04"),
        (
            "hmac-sha1 #6",
            &aa80,
            b"Test Using Larger Than Block-Size Key - Hash Key First",
            "aa4ae5e15272d00e95705637ce8a3b55ed402112",
        ),
        (
            "hmac-sha1 #7",
            &aa80,
            b"Test Using Larger Than Block-Size Key and Larger Than One Block-Size Data",
            "e8e99d0f45237d786d6bbaa7965c7808bbff1a91",
        ),
    ];
    for (name, key, data, digest) in cases {
        check(name, &hmac_sha1(key, data), digest)?;
    }
    Ok(())
}

/// PBKDF2-HMAC-SHA1, RFC 6070.
pub fn pbkdf2_vectors() -> Result<()> {
    let cases: [(&str, &[u8], &[u8], u32, &str); 5] = [
        ("pbkdf2 c=1", b"password", b"salt", 1, "0c60c80f961f0e71f3a9b524af6012062fe037a6"),
        ("pbkdf2 c=2", b"password", b"salt", 2, "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"),
        ("pbkdf2 c=4096", b"password", b"salt", 4096, "4b007901b765489abead49d926f721d065a429c1"),
        (
            "pbkdf2 dkLen=25",
            b"passwordPASSWORDpassword",
            b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
            4096,
            "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038",
        ),
        ("pbkdf2 embedded NUL", b"pass\0word", b"sa\0lt", 4096, "56fa6aa75548099dcc37d7f03425e0c3"),
    ];
    for (name, password, salt, iterations, expected) in cases {
        check(name, &pbkdf2(password, salt, iterations, expected.len() / 2)?, expected)?;
    }
    Ok(())
}

/// WPA passphrase to PSK, IEEE 802.11i-2004 H.4.3.
pub fn wpa_psk_vectors() -> Result<()> {
    let cases = [
        ("wpa-psk #1", "password", "IEEE", "f42c6fc52df0ebef9ebb4b90b38a5f902e83fe1b135a70e23aed762e9710a12e"),
        (
            "wpa-psk #2",
            "ThisIsAPassword",
            "ThisIsASSID",
            "0dc0d6eb90555ed6419756b9a15ec3e3209b63df707dd508d14581f8982721af",
        ),
        (
            "wpa-psk #3",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "ZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZ",
            "becb93866bb8c3832cb777c2f559807c8c59afcb6eae734885001300a981cc62",
        ),
    ];
    for (name, passphrase, ssid, expected) in cases {
        check(name, &wpa_psk(passphrase, ssid)?, expected)?;
    }
    Ok(())
}

/// AES-128-CBC without padding, RFC 3602 section 4.
pub fn aes_cbc_vectors() -> Result<()> {
    let cases: [(&str, &str, &str, &[u8], &str); 4] = [
        (
            "aes-cbc #1",
            "06a9214036b8a15b512e03d534120006",
            "3dafba429d9eb430b422da802c9fac41",
            b"Single block msg",
            "e353779c1079aeb82708942dbe77181a",
        ),
        (
            "aes-cbc #2",
            "c286696d887c9aa0611bbb3e2025a45a",
            "562e17996d093d28ddb3ba695a2e6f58",
            &[
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
                0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,
            ],
            "d296cd94c2cccf8a3a863028b5e1dc0a7586602d253cfff91b8266bea6d61ab1",
        ),
        (
            "aes-cbc #3",
            "6c3ea0477630ce21a2ce334aa746c2cd",
            "c782dc4c098c66cbd9cd27d825682c81",
            b"This is a 48-byte message (exactly 3 AES blocks)",
            "d0a02b3836451753d493665d33f0e8862dea54cdb293abc7506939276772f8d5021c19216bad525c8579695d83ba2684",
        ),
        (
            "aes-cbc #4",
            "56e47a38c5598974bc46903dba290349",
            "8ce82eefbea0da3c44699ed7db51b7d9",
            &[
                0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xab, 0xac, 0xad, 0xae, 0xaf,
                0xb0, 0xb1, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xbb, 0xbc, 0xbd, 0xbe, 0xbf,
                0xc0, 0xc1, 0xc2, 0xc3, 0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xcb, 0xcc, 0xcd, 0xce, 0xcf,
                0xd0, 0xd1, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xdb, 0xdc, 0xdd, 0xde, 0xdf,
            ],
            "c30e32ffedc0774e6aff6af0869f71aa0f3af07a9a31a9c684db207eb0ef8e4e35907aa632c3ffdf868bb7b29d3d46ad83ce9f9a102ee99d49a53e87f4c3da55",
        ),
    ];
    for (name, key, iv, plaintext, expected) in cases {
        let out = aes128_cbc_encrypt(&hex_to_bytes(key)?, &hex_to_bytes(iv)?, plaintext, Padding::None)?;
        check(name, &out, expected)?;
    }
    Ok(())
}

/// AES-CMAC, RFC 4493 section 4.
pub fn cmac_vectors() -> Result<()> {
    let key = hex_to_bytes("2b7e151628aed2a6abf7158809cf4f3c")?;
    let message = hex_to_bytes(
        "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51\
         30c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
    )?;
    let cases = [
        ("cmac len=0", 0, "bb1d6929e95937287fa37d129b756746"),
        ("cmac len=16", 16, "070a16b46b4d4144f79bdd9dd04a287c"),
        ("cmac len=40", 40, "dfa66747de9ae63030ca32611497c827"),
        ("cmac len=64", 64, "51f0bebf7e3b9d92fc49741779363cfe"),
    ];
    for (name, len, expected) in cases {
        check(name, &cmac_aes128(&key, &message[..len])?, expected)?;
    }
    Ok(())
}

/// Runs every known-answer test, stopping at the first failure.
pub fn run() -> Result<()> {
    hmac_sha1_vectors()?;
    pbkdf2_vectors()?;
    wpa_psk_vectors()?;
    aes_cbc_vectors()?;
    cmac_vectors()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_vectors_pass() {
        run().unwrap();
    }

    #[test]
    fn wpa_psk_vectors_pass() {
        wpa_psk_vectors().unwrap();
    }

    #[test]
    fn mismatch_names_the_check() {
        match check("demo", b"\x01", "02") {
            Err(KryptoError::SelfTestFailed(name)) => assert_eq!(name, "demo"),
            other => panic!("expected SelfTestFailed, got: {other:?}"),
        }
    }
}
