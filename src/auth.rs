use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

/// Environment variable holding the key or secret for non-interactive use.
pub const KEY_ENV: &str = "CIPHERSTORE_KEY";

/// Reads the key/secret the command operates on.
///
/// Sources, first non-empty wins:
/// 1. `CIPHERSTORE_KEY="pw" cipherstore decrypt token.json`
/// 2. a line on stdin: `echo pw | cipherstore decrypt token.json`
/// 3. an interactive prompt
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(secret) = std::env::var(KEY_ENV) {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        stdin.lock().read_line(&mut buf)?;
        trim_newline(&mut buf);
        if !buf.is_empty() {
            return Ok(buf);
        }
    } else {
        let secret = Zeroizing::new(rpassword::prompt_password(prompt)?);
        if !secret.is_empty() {
            return Ok(secret);
        }
    }

    bail!("no key provided (set {KEY_ENV}, pipe it on stdin, or type it at the prompt)")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
