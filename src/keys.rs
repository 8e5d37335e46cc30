use std::io::{Read, Seek};

use derivative::Derivative;
use log::debug;

use crate::{parser::Parser, random::SeadRandom, Error};

/// Where the key derivation table starts in the header file.
pub const CRYPT_DATA_OFFSET: u64 = 0x100;
/// Number of words in the key derivation table. Every index into it is masked to 7 bits.
pub const CRYPT_DATA_WORDS: usize = 0x80;
/// Size of the key derivation table in bytes.
pub const CRYPT_DATA_SIZE: usize = CRYPT_DATA_WORDS * 4;

/// The AES-128-CTR parameters of a save. Never printed, not even in debug output.
#[derive(Derivative, Clone, Copy, PartialEq, Eq)]
#[derivative(Debug)]
pub struct CryptoMaterial {
    #[derivative(Debug = "ignore")]
    pub key: [u8; 16],
    #[derivative(Debug = "ignore")]
    pub ctr: [u8; 16],
}

/// Derives one 16 byte parameter from the table, selected by the two words at `idx`.
fn derive_param(crypt_data: &[u32; CRYPT_DATA_WORDS], idx: usize) -> [u8; 16] {
    let seed = crypt_data[(crypt_data[idx] & 0x7F) as usize];
    let roll_count = (crypt_data[(crypt_data[idx + 1] & 0x7F) as usize] & 0xF) + 1;

    let mut rng = SeadRandom::new(seed);
    for _ in 0..roll_count {
        rng.next_u64();
    }

    let mut out = [0; 16];
    for byte in &mut out {
        *byte = (rng.next_u32() >> 24) as u8;
    }

    out
}

impl CryptoMaterial {
    #[must_use]
    pub fn from_crypt_data(crypt_data: &[u32; CRYPT_DATA_WORDS]) -> Self {
        Self {
            key: derive_param(crypt_data, 0),
            ctr: derive_param(crypt_data, 2),
        }
    }
}

/// Derives the key and counter used to encrypt `main.dat` from its header file.
///
/// # Errors
/// Errors with [`Error::ShortRead`] if the header does not contain the whole derivation table,
/// or [`Error::FileOperationFailed`] if reading fails.
pub fn derive_keys(header: impl Read + Seek) -> Result<CryptoMaterial, Error> {
    debug!("Deriving keys");
    let crypt_data = Parser::new(header).read_u32_table::<CRYPT_DATA_WORDS>(CRYPT_DATA_OFFSET)?;
    Ok(CryptoMaterial::from_crypt_data(&crypt_data))
}
