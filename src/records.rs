use std::fmt;

use log::warn;

use crate::{
    date::Date, turnip::TurnipPrices, version::Version, visitor::VisitorSchedule,
    weather::WeatherInfo,
};

/// A fixed layout structure stored at a per-version offset in the decrypted save.
pub trait Record: Default + Sized {
    /// Size of the structure in the save, in bytes.
    const SIZE: usize;
    /// Absolute offset of the structure for each known version.
    const OFFSETS: [usize; Version::KNOWN];

    /// Decodes the structure from exactly [`Self::SIZE`] little endian bytes.
    fn decode(bytes: &[u8]) -> Self;

    /// Copies the record for `version` out of `save`.
    ///
    /// Falls back to the zeroed default for [`Version::Unknown`], or if the save
    /// is too short to hold the record.
    fn extract(version: Version, save: &[u8]) -> Self {
        let Some(index) = version.index() else {
            return Self::default();
        };

        let offset = Self::OFFSETS[index];
        match save.get(offset..offset + Self::SIZE) {
            Some(bytes) => Self::decode(bytes),
            None => {
                warn!(
                    "Save data is {:#x} bytes, too short for the record at {offset:#x}",
                    save.len()
                );
                Self::default()
            }
        }
    }
}

const fn record_end<R: Record>(index: usize) -> usize {
    R::OFFSETS[index] + R::SIZE
}

/// The number of plaintext bytes needed to extract every record of `version`.
pub(crate) const fn required_size(version: Version) -> usize {
    let Some(index) = version.index() else {
        return 0;
    };

    let ends = [
        record_end::<TurnipPrices>(index),
        record_end::<VisitorSchedule>(index),
        record_end::<Date>(index),
        record_end::<WeatherInfo>(index),
    ];

    let mut max = 0;
    let mut i = 0;
    while i < ends.len() {
        if ends[i] > max {
            max = ends[i];
        }
        i += 1;
    }

    max
}

pub(crate) fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Maps the game's day numbering, with Sunday as 0.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        Self::ALL[(self as usize + 6) % 7]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Marker(u32);

    impl Record for Marker {
        const SIZE: usize = 4;
        const OFFSETS: [usize; Version::KNOWN] = [
            0x00, 0x04, 0x04, 0x04, 0x04, 0x04, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0C,
            0x0C, 0x0C, 0x10, 0x100,
        ];

        fn decode(bytes: &[u8]) -> Self {
            Marker(u32_at(bytes, 0))
        }
    }

    fn sample_save() -> Vec<u8> {
        (0u32..8).flat_map(|i| (i + 1).to_le_bytes()).collect()
    }

    #[test]
    fn extracts_by_version() {
        let save = sample_save();
        assert_eq!(Marker::extract(Version::V100, &save), Marker(1));
        assert_eq!(Marker::extract(Version::V114, &save), Marker(2));
        assert_eq!(Marker::extract(Version::V142, &save), Marker(3));
        assert_eq!(Marker::extract(Version::V170, &save), Marker(5));
    }

    #[test]
    fn unknown_version_is_default() {
        assert_eq!(Marker::extract(Version::Unknown, &sample_save()), Marker(0));
    }

    #[test]
    fn out_of_range_is_default() {
        let save = sample_save();
        assert_eq!(Marker::extract(Version::V180, &save), Marker(0));
        assert_eq!(Marker::extract(Version::V170, &save[..0x13]), Marker(0));
    }

    #[test]
    fn required_size_covers_every_record() {
        assert_eq!(required_size(Version::Unknown), 0);
        assert_eq!(required_size(Version::V100), 0xAC_0930);
        assert_eq!(required_size(Version::V180), 0x84_9390);
    }

    #[test]
    fn weekday_helpers() {
        assert_eq!(Weekday::from_index(3), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::Sunday.previous(), Weekday::Saturday);
        assert_eq!(Weekday::Friday.previous(), Weekday::Thursday);
        assert_eq!(Weekday::Monday.to_string(), "monday");
    }
}
