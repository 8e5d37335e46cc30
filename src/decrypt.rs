use std::{
    io::{Read, Seek},
    ops::Deref,
};

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use log::{debug, info, warn};

use crate::{keys::CryptoMaterial, parser::Parser, Error};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

pub const MIN_CHUNK_SIZE: usize = 0x1000;
pub const MAX_CHUNK_SIZE: usize = 0x8_0000;

/// The plaintext of `main.dat`.
///
/// Always as long as the size that was requested; anything past the end of a
/// truncated source is left zeroed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecryptedBuffer {
    data: Vec<u8>,
    filled: usize,
}

impl DecryptedBuffer {
    /// Number of bytes actually decrypted from the source.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.filled < self.data.len()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Deref for DecryptedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for DecryptedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Decrypts the first `size` bytes of `main.dat`.
///
/// The source is read in chunks of `size` bytes, clamped to between
/// [`MIN_CHUNK_SIZE`] and [`MAX_CHUNK_SIZE`].
///
/// # Errors
/// Errors if reading from `main` fails. Running out of data is not an error.
pub fn decrypt_main(
    main: impl Read + Seek,
    size: usize,
    material: &CryptoMaterial,
) -> Result<DecryptedBuffer, Error> {
    decrypt_main_chunked(main, size, material, size)
}

/// [`decrypt_main`], with an explicit chunk size (still clamped).
///
/// # Errors
/// Errors if reading from `main` fails. Running out of data is not an error.
pub fn decrypt_main_chunked(
    main: impl Read + Seek,
    size: usize,
    material: &CryptoMaterial,
    chunk_size: usize,
) -> Result<DecryptedBuffer, Error> {
    let chunk_size = chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
    debug!("Decrypting {size:#x} bytes in chunks of {chunk_size:#x}");

    let mut parser = Parser::new(main);
    let mut cipher = Aes128Ctr::new(&material.key.into(), &material.ctr.into());
    let mut data = vec![0; size];

    let mut offset = 0;
    while offset < size {
        let chunk = &mut data[offset..size.min(offset + chunk_size)];
        let read = parser
            .read_at(chunk, offset as u64)
            .map_err(Error::FileOperationFailed)?;

        cipher.apply_keystream(&mut chunk[..read]);
        offset += read;

        if read != chunk.len() {
            warn!("Save data ended after {offset:#x} bytes, expected {size:#x}");
            break;
        }
    }

    info!("Decrypted {offset:#x} bytes of save data");
    Ok(DecryptedBuffer {
        data,
        filled: offset,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
    use quickcheck_macros::quickcheck;

    use super::*;

    const MATERIAL: CryptoMaterial = CryptoMaterial {
        key: *b"0123456789abcdef",
        ctr: [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xFF, 0xFF,
            0xFF, 0xFE,
        ],
    };

    /// Block at a time AES-128-CTR with a big endian 128 bit counter.
    fn reference_encrypt(plaintext: &[u8], material: &CryptoMaterial) -> Vec<u8> {
        let cipher = Aes128::new(&GenericArray::from(material.key));
        let counter = u128::from_be_bytes(material.ctr);

        let mut out = plaintext.to_vec();
        for (i, chunk) in out.chunks_mut(16).enumerate() {
            let mut block = GenericArray::from(counter.wrapping_add(i as u128).to_be_bytes());
            cipher.encrypt_block(&mut block);
            for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
                *byte ^= pad;
            }
        }

        out
    }

    fn sample_plaintext(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + i / 251) as u8).collect()
    }

    #[test]
    fn round_trip() {
        let plaintext = sample_plaintext(0x2_3456);
        let ciphertext = reference_encrypt(&plaintext, &MATERIAL);
        assert_ne!(plaintext, ciphertext);

        let decrypted = decrypt_main(Cursor::new(ciphertext), plaintext.len(), &MATERIAL).unwrap();
        assert_eq!(&*decrypted, &plaintext[..]);
        assert!(!decrypted.is_truncated());
    }

    #[test]
    fn chunk_size_does_not_shift_keystream() {
        let plaintext = sample_plaintext(0x9_0123);
        let ciphertext = reference_encrypt(&plaintext, &MATERIAL);

        let small =
            decrypt_main_chunked(Cursor::new(&ciphertext), plaintext.len(), &MATERIAL, 0x1000)
                .unwrap();
        let large =
            decrypt_main_chunked(Cursor::new(&ciphertext), plaintext.len(), &MATERIAL, 0x8_0000)
                .unwrap();

        assert_eq!(small, large);
        assert_eq!(&*small, &plaintext[..]);
    }

    #[test]
    fn short_source_zero_fills() {
        let plaintext = sample_plaintext(0x1800);
        let ciphertext = reference_encrypt(&plaintext, &MATERIAL);

        let decrypted =
            decrypt_main_chunked(Cursor::new(ciphertext), 0x4000, &MATERIAL, 0x1000).unwrap();

        assert_eq!(decrypted.len(), 0x4000);
        assert_eq!(decrypted.filled(), 0x1800);
        assert!(decrypted.is_truncated());
        assert_eq!(&decrypted[..0x1800], &plaintext[..]);
        assert!(decrypted[0x1800..].iter().all(|&b| b == 0));

        let data = decrypted.into_inner();
        assert_eq!(data.len(), 0x4000);
        assert_eq!(&data[..0x1800], &plaintext[..]);
    }

    #[test]
    fn longer_source_is_cut_at_size() {
        let plaintext = sample_plaintext(0x3000);
        let ciphertext = reference_encrypt(&plaintext, &MATERIAL);

        let decrypted = decrypt_main(Cursor::new(ciphertext), 0x2001, &MATERIAL).unwrap();
        assert_eq!(&*decrypted, &plaintext[..0x2001]);
    }

    #[test]
    fn empty_request() {
        let decrypted = decrypt_main(Cursor::new(vec![1, 2, 3]), 0, &MATERIAL).unwrap();
        assert!(decrypted.is_empty());
        assert!(!decrypted.is_truncated());
    }

    #[quickcheck]
    fn any_chunk_size_matches_reference(len: u16, chunk_size: u32) -> bool {
        let data = sample_plaintext(len as usize);
        let ciphertext = reference_encrypt(&data, &MATERIAL);
        decrypt_main_chunked(Cursor::new(ciphertext), data.len(), &MATERIAL, chunk_size as usize)
            .map(|decrypted| *decrypted == data[..])
            .unwrap_or(false)
    }
}
