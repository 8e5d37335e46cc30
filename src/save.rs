use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};

use derivative::Derivative;
use log::{debug, info, warn};

use crate::{
    date::Date,
    decrypt::{decrypt_main_chunked, DecryptedBuffer},
    keys::derive_keys,
    records::Record,
    turnip::TurnipPrices,
    version::{resolve_version, Version},
    visitor::VisitorSchedule,
    weather::WeatherInfo,
    Error,
};

pub const HEADER_FILE_NAME: &str = "mainHeader.dat";
pub const MAIN_FILE_NAME: &str = "main.dat";

/// Where to find the save files and how to decrypt them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub header_file: PathBuf,
    pub main_file: PathBuf,
    /// Overrides [`Version::plaintext_size`].
    pub plaintext_size: Option<usize>,
    /// Overrides the chunk size, which is still clamped to the supported range.
    pub chunk_size: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header_file: PathBuf::from(HEADER_FILE_NAME),
            main_file: PathBuf::from(MAIN_FILE_NAME),
            plaintext_size: None,
            chunk_size: None,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn with_header_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_file = path.into();
        self
    }

    #[must_use]
    pub fn with_main_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.main_file = path.into();
        self
    }

    #[must_use]
    pub fn with_plaintext_size(mut self, size: usize) -> Self {
        self.plaintext_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
}

/// Every record the save exposes, copied out of the decrypted data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub version: Version,
    pub turnips: TurnipPrices,
    pub visitors: VisitorSchedule,
    pub date: Date,
    pub weather: WeatherInfo,
}

/// A decrypted save.
///
/// Saves from unknown versions still load, but every record reads as its default.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Save {
    version: Version,
    #[derivative(Debug = "ignore")]
    data: DecryptedBuffer,
}

impl Save {
    /// Loads the save stored in `dir`.
    ///
    /// # Errors
    /// Errors if either file cannot be opened or read, or the header is too short to derive keys.
    pub fn open(dir: &Path, options: &LoadOptions) -> Result<Self, Error> {
        let header_path = dir.join(&options.header_file);
        let main_path = dir.join(&options.main_file);
        debug!("Opening {} and {}", header_path.display(), main_path.display());

        let header = File::open(header_path).map_err(Error::FileOperationFailed)?;
        let main = File::open(main_path).map_err(Error::FileOperationFailed)?;

        Self::from_readers(BufReader::new(header), BufReader::new(main), options)
    }

    /// Loads a save from its header and main data.
    ///
    /// # Errors
    /// Errors if reading fails, or the header is too short to derive keys.
    pub fn from_readers(
        mut header: impl Read + Seek,
        main: impl Read + Seek,
        options: &LoadOptions,
    ) -> Result<Self, Error> {
        let version = resolve_version(&mut header)?;
        let material = derive_keys(&mut header)?;

        let size = options
            .plaintext_size
            .unwrap_or_else(|| version.plaintext_size());
        let chunk_size = options.chunk_size.unwrap_or(size);
        let data = decrypt_main_chunked(main, size, &material, chunk_size)?;

        if data.is_truncated() {
            warn!("Save data is truncated, missing records will read as empty");
        }
        info!("Loaded save for version {version}");

        Ok(Self { version, data })
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn data(&self) -> &DecryptedBuffer {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> DecryptedBuffer {
        self.data
    }

    #[must_use]
    pub fn turnips(&self) -> TurnipPrices {
        TurnipPrices::extract(self.version, &self.data)
    }

    #[must_use]
    pub fn visitors(&self) -> VisitorSchedule {
        VisitorSchedule::extract(self.version, &self.data)
    }

    #[must_use]
    pub fn date(&self) -> Date {
        Date::extract(self.version, &self.data)
    }

    #[must_use]
    pub fn weather(&self) -> WeatherInfo {
        WeatherInfo::extract(self.version, &self.data)
    }

    #[must_use]
    pub fn summary(&self) -> SaveSummary {
        SaveSummary {
            version: self.version,
            turnips: self.turnips(),
            visitors: self.visitors(),
            date: self.date(),
            weather: self.weather(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::keys::{CRYPT_DATA_OFFSET, CRYPT_DATA_SIZE};

    fn unknown_header() -> Vec<u8> {
        let mut header = vec![0; CRYPT_DATA_OFFSET as usize + CRYPT_DATA_SIZE];
        header[..4].copy_from_slice(b"????");
        header
    }

    #[test]
    fn unknown_version_degrades_to_defaults() {
        let options = LoadOptions::default().with_plaintext_size(0x2000);
        let save =
            Save::from_readers(Cursor::new(unknown_header()), Cursor::new(vec![0; 0x2000]), &options)
                .unwrap();

        assert_eq!(save.version(), Version::Unknown);
        assert_eq!(save.data().len(), 0x2000);
        assert_eq!(
            save.summary(),
            SaveSummary {
                version: Version::Unknown,
                ..SaveSummary::default()
            }
        );
    }

    #[test]
    fn unknown_version_uses_legacy_size() {
        let save = Save::from_readers(
            Cursor::new(unknown_header()),
            Cursor::new(Vec::new()),
            &LoadOptions::default(),
        )
        .unwrap();

        assert_eq!(save.data().len(), crate::version::LEGACY_SAVE_SIZE);
        assert_eq!(save.data().filled(), 0);
    }

    #[test]
    fn header_without_key_table() {
        let result = Save::from_readers(
            Cursor::new(vec![0; 0x100]),
            Cursor::new(vec![0; 0x100]),
            &LoadOptions::default(),
        );
        assert!(matches!(result, Err(Error::ShortRead { .. })));
    }

    #[test]
    fn missing_directory() {
        let dir = std::env::temp_dir().join("turnips-save-does-not-exist");
        let result = Save::open(&dir, &LoadOptions::default());
        assert!(matches!(result, Err(Error::FileOperationFailed(_))));
    }

    #[test]
    fn options_builder() {
        let options = LoadOptions::default()
            .with_header_file("hdr.bin")
            .with_main_file("data.bin")
            .with_chunk_size(0x2000);

        assert_eq!(options.header_file, PathBuf::from("hdr.bin"));
        assert_eq!(options.main_file, PathBuf::from("data.bin"));
        assert_eq!(options.chunk_size, Some(0x2000));
        assert_eq!(options.plaintext_size, None);
    }
}
