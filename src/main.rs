use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cipherstore::{
    CipherStore, HashAlgoId, HashStore, Storage, derive_bytes, derive_key_bytes, nonce_bytes,
    nonce_string, random_bytes, random_int, selftest,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod auth;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HashAlgoArg {
    Sha1,
    Pbkdf2,
}

impl From<HashAlgoArg> for HashAlgoId {
    fn from(arg: HashAlgoArg) -> Self {
        match arg {
            HashAlgoArg::Sha1 => HashAlgoId::Sha1,
            HashAlgoArg::Pbkdf2 => HashAlgoId::Pbkdf2,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cipherstore")]
#[command(
    version,
    about = "Salted password hashes and password-encrypted records."
)]
struct Cli {
    /// Base directory for relative record paths
    #[arg(long, global = true, value_name = "DIR", env = "CIPHERSTORE_DIR")]
    dir: Option<PathBuf>,

    /// Log what is being done to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stores a salted hash of a secret
    #[command(arg_required_else_help = true)]
    Hash {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "sha1")]
        algo: HashAlgoArg,
        /// Static salt mixed into the hash (must be given again to verify)
        #[arg(long, default_value = "")]
        salt: String,
    },

    /// Checks a secret against a stored hash
    #[command(arg_required_else_help = true)]
    Verify {
        file: PathBuf,
        #[arg(long, default_value = "")]
        salt: String,
    },

    /// Encrypts text or a file into a cipher store
    #[command(arg_required_else_help = true)]
    Encrypt {
        file: PathBuf,
        /// Text to encrypt
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        text: Option<String>,
        /// File whose contents are encrypted
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Decrypts a cipher store
    #[command(arg_required_else_help = true)]
    Decrypt {
        file: PathBuf,
        /// Write the plaintext here instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Derives key bytes from a phrase (hex output)
    #[command(arg_required_else_help = true)]
    Derive {
        text: String,
        #[arg(long, default_value_t = 32)]
        len: usize,
        /// Fast, non-cryptographic derivation
        #[arg(long, default_value_t = false)]
        fast: bool,
    },

    /// Prints a nonce
    Nonce {
        /// Print this many nonce bytes as hex instead of a nonce string
        #[arg(long)]
        len: Option<usize>,
    },

    /// Prints secure random bytes (hex)
    Random {
        #[arg(long, default_value_t = 16)]
        len: usize,
        /// Print a signed 32-bit integer instead
        #[arg(long, default_value_t = false)]
        int: bool,
    },

    /// Runs the built-in known-answer tests
    Selftest,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cipherstore=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_storage(dir: Option<&PathBuf>, file: PathBuf) -> Storage {
    match dir {
        Some(dir) if file.is_relative() => Storage::new(dir.join(file)),
        _ => Storage::new(file),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_tracing(args.verbose);
    let dir = args.dir.as_ref();

    match args.command {
        Commands::Hash { file, algo, salt } => {
            let storage = resolve_storage(dir, file);
            let secret = auth::read_secret("Secret: ")?;
            let record = HashStore::create(secret.as_bytes(), salt.as_bytes(), algo.into())?;
            storage
                .save_record(&record)
                .with_context(|| format!("failed to write {}", storage.path().display()))?;
            println!("hash stored in {}", storage.path().display());
        }
        Commands::Verify { file, salt } => {
            let storage = resolve_storage(dir, file);
            if !storage.exists() {
                bail!("record {} does not exist", storage.path().display());
            }
            let record = storage
                .load_hash_store()
                .context("failed to load hash record")?;
            let secret = auth::read_secret("Secret: ")?;
            if !record.verify(secret.as_bytes(), salt.as_bytes())? {
                bail!("secret does not match");
            }
            println!("match");
        }
        Commands::Encrypt { file, text, input } => {
            let storage = resolve_storage(dir, file);
            let plaintext = match (text, input) {
                (Some(text), _) => zeroize::Zeroizing::new(text.into_bytes()),
                (None, Some(path)) => zeroize::Zeroizing::new(
                    std::fs::read(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                ),
                (None, None) => bail!("nothing to encrypt: pass --text or --input"),
            };
            let key = auth::read_secret("Key: ")?;
            let record = CipherStore::create(plaintext.as_slice(), key.as_bytes())?;
            storage
                .save_record(&record)
                .with_context(|| format!("failed to write {}", storage.path().display()))?;
            debug!(bytes = plaintext.len(), "encrypted input");
            println!("encrypted into {}", storage.path().display());
        }
        Commands::Decrypt { file, output } => {
            let storage = resolve_storage(dir, file);
            if !storage.exists() {
                bail!("record {} does not exist", storage.path().display());
            }
            let record = storage
                .load_cipher_store()
                .context("failed to load cipher record")?;
            let key = auth::read_secret("Key: ")?;
            let plaintext = record.decrypt(key.as_bytes())?;
            match output {
                Some(path) => Storage::new(path).save(&plaintext)?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&plaintext)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Derive { text, len, fast } => {
            let bytes = if fast {
                derive_bytes(&text, len)?
            } else {
                derive_key_bytes(&text, len)?
            };
            println!("{}", hex::encode(bytes));
        }
        Commands::Nonce { len } => match len {
            Some(len) => println!("{}", hex::encode(nonce_bytes(len)?)),
            None => println!("{}", nonce_string()?),
        },
        Commands::Random { len, int } => {
            if int {
                println!("{}", random_int()?);
            } else {
                println!("{}", hex::encode(random_bytes(len)?));
            }
        }
        Commands::Selftest => {
            selftest::run()?;
            println!("all self-tests passed");
        }
    }

    Ok(())
}
