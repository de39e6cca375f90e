//! AES-CMAC (RFC 4493).

use aes::{
    Aes128, Block,
    cipher::{BlockEncrypt, KeyInit},
};

use super::BLOCK_LEN;
use crate::error::{KryptoError, Result};

const RB: u8 = 0x87;

/// Left shift by one bit in GF(2^128), reducing with `Rb` on carry.
fn dbl(block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let mut out = [0u8; BLOCK_LEN];
    let mut carry = 0u8;
    for i in (0..BLOCK_LEN).rev() {
        out[i] = (block[i] << 1) | carry;
        carry = block[i] >> 7;
    }
    if carry != 0 {
        out[BLOCK_LEN - 1] ^= RB;
    }
    out
}

fn encrypt_block(cipher: &Aes128, input: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let mut block = Block::clone_from_slice(input);
    cipher.encrypt_block(&mut block);
    block.into()
}

fn xor_into(acc: &mut [u8; BLOCK_LEN], other: &[u8]) {
    acc.iter_mut().zip(other).for_each(|(a, b)| *a ^= b);
}

/// Computes the 16-byte AES-128-CMAC tag of `message`.
pub fn cmac_aes128(key: &[u8], message: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    let cipher = Aes128::new_from_slice(key).map_err(|_| {
        KryptoError::InvalidParameter(format!("AES-128 key must be 16 bytes, got {}", key.len()))
    })?;

    let l = encrypt_block(&cipher, &[0u8; BLOCK_LEN]);
    let k1 = dbl(&l);
    let k2 = dbl(&k1);

    let (n, complete) = match message.len() {
        0 => (1, false),
        len => (len.div_ceil(BLOCK_LEN), len % BLOCK_LEN == 0),
    };

    let tail = &message[(n - 1) * BLOCK_LEN..];
    let mut last = [0u8; BLOCK_LEN];
    if complete {
        last.copy_from_slice(tail);
        xor_into(&mut last, &k1);
    } else {
        last[..tail.len()].copy_from_slice(tail);
        last[tail.len()] = 0x80;
        xor_into(&mut last, &k2);
    }

    let mut x = [0u8; BLOCK_LEN];
    for chunk in message.chunks(BLOCK_LEN).take(n - 1) {
        xor_into(&mut x, chunk);
        x = encrypt_block(&cipher, &x);
    }
    xor_into(&mut x, &last);
    Ok(encrypt_block(&cipher, &x))
}
