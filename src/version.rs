use std::{
    fmt,
    io::{Read, Seek},
};

use log::{debug, info, warn};

use crate::{parser::Parser, records, Error};

/// Plaintext size read by the legacy layout, used when the version is not recognised.
pub const LEGACY_SAVE_SIZE: usize = 0x50_0000;
/// Plaintext size of the current save layout.
pub const SAVE_SIZE: usize = 0xB0_0000;

/// The identifying record at the start of `mainHeader.dat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub major: u32,
    pub minor: u32,
    pub unk_1: u16,
    pub header_rev: u16,
    pub unk_2: u16,
    pub save_rev: u16,
}

impl Fingerprint {
    pub const SIZE: usize = 0x10;

    #[must_use]
    pub const fn new(
        major: u32,
        minor: u32,
        unk_1: u16,
        header_rev: u16,
        unk_2: u16,
        save_rev: u16,
    ) -> Self {
        Self {
            major,
            minor,
            unk_1,
            header_rev,
            unk_2,
            save_rev,
        }
    }

    #[must_use]
    pub const fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let b = bytes;
        Self {
            major: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            minor: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            unk_1: u16::from_le_bytes([b[8], b[9]]),
            header_rev: u16::from_le_bytes([b[10], b[11]]),
            unk_2: u16::from_le_bytes([b[12], b[13]]),
            save_rev: u16::from_le_bytes([b[14], b[15]]),
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0; Self::SIZE];
        out[0..4].copy_from_slice(&self.major.to_le_bytes());
        out[4..8].copy_from_slice(&self.minor.to_le_bytes());
        out[8..10].copy_from_slice(&self.unk_1.to_le_bytes());
        out[10..12].copy_from_slice(&self.header_rev.to_le_bytes());
        out[12..14].copy_from_slice(&self.unk_2.to_le_bytes());
        out[14..16].copy_from_slice(&self.save_rev.to_le_bytes());
        out
    }
}

/// A game release with a known save layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    V100,
    V110,
    V111,
    V112,
    V113,
    V114,
    V120,
    V121,
    V130,
    V131,
    V140,
    V141,
    V142,
    V150,
    V151,
    V160,
    V170,
    V180,
    #[default]
    Unknown,
}

impl Version {
    /// Number of known releases, the length of every version indexed table.
    pub const KNOWN: usize = 18;

    pub const ALL: [Version; Self::KNOWN] = [
        Version::V100,
        Version::V110,
        Version::V111,
        Version::V112,
        Version::V113,
        Version::V114,
        Version::V120,
        Version::V121,
        Version::V130,
        Version::V131,
        Version::V140,
        Version::V141,
        Version::V142,
        Version::V150,
        Version::V151,
        Version::V160,
        Version::V170,
        Version::V180,
    ];

    /// Position of this release in the version indexed tables.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Version::Unknown => None,
            known => Some(known as usize),
        }
    }

    #[must_use]
    pub const fn fingerprint(self) -> Option<Fingerprint> {
        match self.index() {
            Some(index) => Some(FINGERPRINTS[index]),
            None => None,
        }
    }

    /// Matches a fingerprint against the table, first match wins.
    #[must_use]
    pub fn from_fingerprint(fingerprint: &Fingerprint) -> Self {
        FINGERPRINTS
            .iter()
            .position(|known| known == fingerprint)
            .map_or(Version::Unknown, |index| Self::ALL[index])
    }

    /// How many plaintext bytes to decrypt for this release.
    #[must_use]
    pub const fn plaintext_size(self) -> usize {
        match self {
            Version::Unknown => LEGACY_SAVE_SIZE,
            known => {
                let required = records::required_size(known);
                if required > SAVE_SIZE {
                    required
                } else {
                    SAVE_SIZE
                }
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Version::V100 => "1.0.0",
            Version::V110 => "1.1.0",
            Version::V111 => "1.1.1",
            Version::V112 => "1.1.2",
            Version::V113 => "1.1.3",
            Version::V114 => "1.1.4",
            Version::V120 => "1.2.0",
            Version::V121 => "1.2.1",
            Version::V130 => "1.3.0",
            Version::V131 => "1.3.1",
            Version::V140 => "1.4.0",
            Version::V141 => "1.4.1",
            Version::V142 => "1.4.2",
            Version::V150 => "1.5.0",
            Version::V151 => "1.5.1",
            Version::V160 => "1.6.0",
            Version::V170 => "1.7.0",
            Version::V180 => "1.8.0",
            Version::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

#[rustfmt::skip]
const FINGERPRINTS: [Fingerprint; Version::KNOWN] = [
    Fingerprint::new(0x67,    0x6f,    2, 0, 2, 0),  // 1.0.0
    Fingerprint::new(0x6d,    0x78,    2, 0, 2, 1),  // 1.1.0
    Fingerprint::new(0x6d,    0x78,    2, 0, 2, 2),  // 1.1.1
    Fingerprint::new(0x6d,    0x78,    2, 0, 2, 3),  // 1.1.2
    Fingerprint::new(0x6d,    0x78,    2, 0, 2, 4),  // 1.1.3
    Fingerprint::new(0x6d,    0x78,    2, 0, 2, 5),  // 1.1.4
    Fingerprint::new(0x20006, 0x20008, 2, 0, 2, 6),  // 1.2.0
    Fingerprint::new(0x20006, 0x20008, 2, 0, 2, 7),  // 1.2.1
    Fingerprint::new(0x40002, 0x40008, 2, 0, 2, 8),  // 1.3.0
    Fingerprint::new(0x40002, 0x40008, 2, 0, 2, 9),  // 1.3.1
    Fingerprint::new(0x50001, 0x5000b, 2, 0, 2, 10), // 1.4.0
    Fingerprint::new(0x50001, 0x5000b, 2, 0, 2, 11), // 1.4.1
    Fingerprint::new(0x50001, 0x5000b, 2, 0, 2, 12), // 1.4.2
    Fingerprint::new(0x60001, 0x6000c, 2, 0, 2, 13), // 1.5.0
    Fingerprint::new(0x60001, 0x6000c, 2, 0, 2, 14), // 1.5.1
    Fingerprint::new(0x70001, 0x70006, 2, 0, 2, 15), // 1.6.0
    Fingerprint::new(0x74001, 0x74005, 2, 0, 2, 16), // 1.7.0
    Fingerprint::new(0x78001, 0x78001, 2, 0, 2, 17), // 1.8.0
];

const _: () = {
    assert!(Version::Unknown as usize == Version::KNOWN);

    let mut i = 0;
    while i < Version::KNOWN {
        assert!(Version::ALL[i] as usize == i);
        i += 1;
    }
};

/// Identifies the game release that wrote a save from its header file.
///
/// A header too short to hold a fingerprint resolves to [`Version::Unknown`].
///
/// # Errors
/// Errors if reading from `header` fails for any reason other than running out of data.
pub fn resolve_version(header: impl Read + Seek) -> Result<Version, Error> {
    debug!("Reading version fingerprint");
    let Some(fingerprint) = Parser::new(header).read_fingerprint()? else {
        return Ok(Version::Unknown);
    };

    let version = Version::from_fingerprint(&fingerprint);
    if version == Version::Unknown {
        warn!("Unrecognised save fingerprint {fingerprint:?}");
    } else {
        info!("Save was written by game version {version}");
    }

    Ok(version)
}
