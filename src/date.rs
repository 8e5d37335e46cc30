use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::{
    records::{u16_at, Record, Weekday},
    version::Version,
    Error,
};

/// The in-game clock at the time of saving.
///
/// ```text
/// 0x00  u16  year
/// 0x02  u8   month, 1 based
/// 0x03  u8   day, 1 based
/// 0x04  u8   hour
/// 0x05  u8   minute
/// 0x06  u8   second
/// 0x07  u8   padding
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[rustfmt::skip]
const DATE_OFFSETS: [usize; Version::KNOWN] = [
    0xAC_0928,                                              // 1.0.0
    0xAC_27C8, 0xAC_27C8, 0xAC_27C8, 0xAC_27C8, 0xAC_27C8,  // 1.1.x
    0xAC_E9F8, 0xAC_E9F8,                                   // 1.2.x
    0xAC_EAA8, 0xAC_EAA8,                                   // 1.3.x
    0xB0_54A8, 0xB0_54A8, 0xB0_54A8,                        // 1.4.x
    0xB2_0468, 0xB2_0468,                                   // 1.5.x
    0xB2_5038,                                              // 1.6.0
    0x84_9388,                                              // 1.7.0
    0x84_9388,                                              // 1.8.0
];

impl Record for Date {
    const SIZE: usize = 0x8;
    const OFFSETS: [usize; Version::KNOWN] = DATE_OFFSETS;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            year: u16_at(bytes, 0),
            month: bytes[2],
            day: bytes[3],
            hour: bytes[4],
            minute: bytes[5],
            second: bytes[6],
        }
    }
}

impl Date {
    /// The date as a calendar value, `None` if it is not a real instant (such as the zeroed default).
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
        )
    }

    #[must_use]
    pub fn weekday(&self) -> Option<Weekday> {
        let date = self.to_naive()?;
        Weekday::from_index(date.weekday().num_days_from_sunday())
    }

    /// Seconds since the unix epoch, reading the in-game time as UTC.
    ///
    /// # Errors
    /// Errors if the stored fields do not form a valid date.
    pub fn to_posix(&self) -> Result<i64, Error> {
        self.to_naive()
            .map(|date| date.and_utc().timestamp())
            .ok_or(Error::InvalidDate(*self))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
