use std::fmt;

use crate::{
    records::{u32_at, Record},
    version::Version,
    Error,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

const HEMISPHERE_NAMES: [&str; 2] = ["northern", "southern"];

impl Hemisphere {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Hemisphere::Northern),
            1 => Some(Hemisphere::Southern),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        HEMISPHERE_NAMES[self as usize]
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The island's weather generator input.
///
/// ```text
/// 0x00  u32  hemisphere
/// 0x04  u32  raw_seed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherInfo {
    pub hemisphere: u32,
    pub raw_seed: u32,
}

#[rustfmt::skip]
const WEATHER_OFFSETS: [usize; Version::KNOWN] = [
    0x1D_70CC,                                              // 1.0.0
    0x1D_70D4, 0x1D_70D4, 0x1D_70D4, 0x1D_70D4, 0x1D_70D4,  // 1.1.x
    0x1D_70D4, 0x1D_70D4,                                   // 1.2.x
    0x1D_70D4, 0x1D_70D4,                                   // 1.3.x
    0x1D_70D4, 0x1D_70D4, 0x1D_70D4,                        // 1.4.x
    0x1E_24D4, 0x1E_24D4,                                   // 1.5.x
    0x1E_24D4,                                              // 1.6.0
    0x1E_24D4,                                              // 1.7.0
    0x1E_24D4,                                              // 1.8.0
];

const WEATHER_SEED_MAX: u32 = 2_147_483_647;

impl Record for WeatherInfo {
    const SIZE: usize = 0x8;
    const OFFSETS: [usize; Version::KNOWN] = WEATHER_OFFSETS;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            hemisphere: u32_at(bytes, 0),
            raw_seed: u32_at(bytes, 4),
        }
    }
}

impl WeatherInfo {
    /// The seed as weather prediction tools expect it, the stored value shifted by 2^31.
    #[must_use]
    pub const fn calculate_weather_seed(&self) -> u32 {
        self.raw_seed.wrapping_sub(WEATHER_SEED_MAX).wrapping_sub(1)
    }

    /// # Errors
    /// Errors if the stored hemisphere is neither northern nor southern.
    pub fn hemisphere(&self) -> Result<Hemisphere, Error> {
        Hemisphere::from_raw(self.hemisphere).ok_or(Error::InvalidHemisphere(self.hemisphere))
    }
}
