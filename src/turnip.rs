use std::fmt;

use crate::{
    records::{u32_at, Record, Weekday},
    version::Version,
    Error,
};

/// Whether a price is the morning or the afternoon one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalfDay {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayPrices {
    pub am: u32,
    pub pm: u32,
}

/// The price trend the game rolled for this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Fluctuating,
    LargeSpike,
    Decreasing,
    SmallSpike,
}

const PATTERN_NAMES: [&str; 4] = ["fluctuating", "large_spike", "decreasing", "small_spike"];

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Fluctuating,
        Pattern::LargeSpike,
        Pattern::Decreasing,
        Pattern::SmallSpike,
    ];

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        PATTERN_NAMES[self as usize]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistics over the selling prices of a week.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSummary {
    pub min: u32,
    pub max: u32,
    pub average: f32,
}

/// The turnip price table of the current week.
///
/// ```text
/// 0x00  u32       buy_price
/// 0x04  u32 * 14  week_prices, Sunday AM to Saturday PM
/// 0x3C  u32       pattern_type
/// 0x40  u32       unknown
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnipPrices {
    pub buy_price: u32,
    pub week_prices: [u32; 14],
    pub pattern_type: u32,
    pub unk: u32,
}

#[rustfmt::skip]
const TURNIP_OFFSETS: [usize; Version::KNOWN] = [
    0x41_18C0,                                              // 1.0.0
    0x41_2060, 0x41_2060, 0x41_2060, 0x41_2060, 0x41_2060,  // 1.1.x
    0x41_2060, 0x41_2060,                                   // 1.2.x
    0x41_2060, 0x41_2060,                                   // 1.3.x
    0x41_2060, 0x41_2060, 0x41_2060,                        // 1.4.x
    0x41_D4A0, 0x41_D4A0,                                   // 1.5.x
    0x41_D570,                                              // 1.6.0
    0x41_B63C,                                              // 1.7.0
    0x41_B63C,                                              // 1.8.0
];

const _: () = assert!(TurnipPrices::SIZE == 4 + 14 * 4 + 4 + 4);

impl Record for TurnipPrices {
    const SIZE: usize = 0x44;
    const OFFSETS: [usize; Version::KNOWN] = TURNIP_OFFSETS;

    fn decode(bytes: &[u8]) -> Self {
        let mut week_prices = [0; 14];
        for (i, price) in week_prices.iter_mut().enumerate() {
            *price = u32_at(bytes, 0x04 + i * 4);
        }

        Self {
            buy_price: u32_at(bytes, 0x00),
            week_prices,
            pattern_type: u32_at(bytes, 0x3C),
            unk: u32_at(bytes, 0x40),
        }
    }
}

impl TurnipPrices {
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> DayPrices {
        let i = weekday.index() * 2;
        DayPrices {
            am: self.week_prices[i],
            pm: self.week_prices[i + 1],
        }
    }

    #[must_use]
    pub fn price(&self, weekday: Weekday, half: HalfDay) -> u32 {
        let day = self.day(weekday);
        match half {
            HalfDay::Am => day.am,
            HalfDay::Pm => day.pm,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, DayPrices)> + '_ {
        Weekday::ALL.into_iter().map(|weekday| (weekday, self.day(weekday)))
    }

    /// Monday AM to Saturday PM, Sunday is when turnips are bought.
    #[must_use]
    pub fn selling_prices(&self) -> &[u32] {
        &self.week_prices[2..]
    }

    /// # Errors
    /// Errors if the stored pattern is not one the game defines.
    pub fn pattern(&self) -> Result<Pattern, Error> {
        Pattern::from_raw(self.pattern_type).ok_or(Error::InvalidPattern(self.pattern_type))
    }

    #[must_use]
    pub fn summary(&self) -> PriceSummary {
        let prices = self.selling_prices();
        let min = prices.iter().copied().min().unwrap_or_default();
        let max = prices.iter().copied().max().unwrap_or_default();
        let total: u64 = prices.iter().map(|&price| price as u64).sum();

        PriceSummary {
            min,
            max,
            average: total as f32 / prices.len() as f32,
        }
    }
}
