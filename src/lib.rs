//! # Turnips
//!
//! This library reads the encrypted save of Animal Crossing: New Horizons and extracts
//! the turnip price table, the weekly visitor schedule, the in-game date and the weather seed.
//!
//! Loading goes through four steps, each available on its own:
//! - [`resolve_version`] identifies the game release from the fingerprint in `mainHeader.dat`.
//! - [`derive_keys`] derives the AES-128-CTR key and counter from the same header.
//! - [`decrypt_main`] decrypts `main.dat`.
//! - [`Record::extract`] copies a record out of the plaintext for the resolved version.
//!
//! [`Save`] runs all of them. Saves from unknown releases still load, with every record
//! left at its zeroed default.
//!
//! Only reading is supported, saves are never written back.

#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]

pub use crate::{
    date::Date,
    decrypt::{decrypt_main, decrypt_main_chunked, DecryptedBuffer, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE},
    keys::{derive_keys, CryptoMaterial, CRYPT_DATA_OFFSET, CRYPT_DATA_SIZE, CRYPT_DATA_WORDS},
    random::SeadRandom,
    records::{Record, Weekday},
    save::{LoadOptions, Save, SaveSummary, HEADER_FILE_NAME, MAIN_FILE_NAME},
    turnip::{DayPrices, HalfDay, Pattern, PriceSummary, TurnipPrices},
    version::{resolve_version, Fingerprint, Version, LEGACY_SAVE_SIZE, SAVE_SIZE},
    visitor::{visiting_weekday, Visitor, VisitorSchedule},
    weather::{Hemisphere, WeatherInfo},
};

mod date;
mod decrypt;
mod keys;
mod parser;
mod random;
mod records;
mod save;
mod turnip;
mod version;
mod visitor;
mod weather;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Underlying error when reading from file")]
    FileOperationFailed(std::io::Error),
    #[error("Header was too short: read {found:#x} bytes, expected {expected:#x}")]
    ShortRead { expected: usize, found: usize },
    #[error("Save contained an invalid turnip pattern {0}")]
    InvalidPattern(u32),
    #[error("Save contained an invalid visitor id {0}")]
    InvalidVisitor(u32),
    #[error("Save contained an invalid hemisphere {0}")]
    InvalidHemisphere(u32),
    #[error("Save contained an invalid date {0}")]
    InvalidDate(Date),
}
