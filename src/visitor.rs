use std::fmt;

use crate::{
    records::{u32_at, Record, Weekday},
    version::Version,
    Error,
};

/// Special characters that can visit the island.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visitor {
    #[default]
    None,
    Gulliver,
    Label,
    Saharah,
    Wisp,
    Mabel,
    Cj,
    Flick,
    Kicks,
    Leif,
    Redd,
    Gullivarrr,
}

const VISITOR_NAMES: [&str; 12] = [
    "none",
    "gulliver",
    "label",
    "saharah",
    "wisp",
    "mabel",
    "cj",
    "flick",
    "kicks",
    "leif",
    "redd",
    "gullivarrr",
];

impl Visitor {
    pub const ALL: [Visitor; 12] = [
        Visitor::None,
        Visitor::Gulliver,
        Visitor::Label,
        Visitor::Saharah,
        Visitor::Wisp,
        Visitor::Mabel,
        Visitor::Cj,
        Visitor::Flick,
        Visitor::Kicks,
        Visitor::Leif,
        Visitor::Redd,
        Visitor::Gullivarrr,
    ];

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        VISITOR_NAMES[self as usize]
    }
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who visits the island on each day of the current week.
///
/// ```text
/// 0x00  u32 * 7   npcs, indexed by weekday
/// 0x1C  0x54      not decoded
/// 0x70  u32       wisp_day
/// 0x74  u32       celeste_day
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitorSchedule {
    pub npcs: [u32; 7],
    pub wisp_day: u32,
    pub celeste_day: u32,
}

#[rustfmt::skip]
const VISITOR_OFFSETS: [usize; Version::KNOWN] = [
    0x41_4F8C,                                              // 1.0.0
    0x41_572C, 0x41_572C, 0x41_572C, 0x41_572C, 0x41_572C,  // 1.1.x
    0x41_59D8, 0x41_59D8,                                   // 1.2.x
    0x41_59D8, 0x41_59D8,                                   // 1.3.x
    0x41_59D8, 0x41_59D8, 0x41_59D8,                        // 1.4.x
    0x42_0E18, 0x42_0E18,                                   // 1.5.x
    0x42_0EE8,                                              // 1.6.0
    0x41_F0B4,                                              // 1.7.0
    0x41_F0B4,                                              // 1.8.0
];

const WISP_DAY_OFFSET: usize = 0x70;
const CELESTE_DAY_OFFSET: usize = 0x74;

const _: () = assert!(VisitorSchedule::SIZE == CELESTE_DAY_OFFSET + 4);

impl Record for VisitorSchedule {
    const SIZE: usize = 0x78;
    const OFFSETS: [usize; Version::KNOWN] = VISITOR_OFFSETS;

    fn decode(bytes: &[u8]) -> Self {
        let mut npcs = [0; 7];
        for (i, npc) in npcs.iter_mut().enumerate() {
            *npc = u32_at(bytes, i * 4);
        }

        Self {
            npcs,
            wisp_day: u32_at(bytes, WISP_DAY_OFFSET),
            celeste_day: u32_at(bytes, CELESTE_DAY_OFFSET),
        }
    }
}

impl VisitorSchedule {
    /// # Errors
    /// Errors if the stored visitor id is not in the name table.
    pub fn visitor(&self, weekday: Weekday) -> Result<Visitor, Error> {
        let raw = self.npcs[weekday.index()];
        Visitor::from_raw(raw).ok_or(Error::InvalidVisitor(raw))
    }

    /// # Errors
    /// Errors if any stored visitor id is not in the name table.
    pub fn visitors(&self) -> Result<[Visitor; 7], Error> {
        let mut out = [Visitor::None; 7];
        for (slot, weekday) in out.iter_mut().zip(Weekday::ALL) {
            *slot = self.visitor(weekday)?;
        }
        Ok(out)
    }

    /// # Errors
    /// Errors if any stored visitor id is not in the name table.
    pub fn visitor_names(&self) -> Result<[&'static str; 7], Error> {
        Ok(self.visitors()?.map(Visitor::name))
    }

    #[must_use]
    pub fn wisp_day(&self) -> u32 {
        self.wisp_day
    }

    #[must_use]
    pub fn celeste_day(&self) -> u32 {
        self.celeste_day
    }

    #[must_use]
    pub fn wisp_weekday(&self) -> Option<Weekday> {
        Weekday::from_index(self.wisp_day)
    }

    #[must_use]
    pub fn celeste_weekday(&self) -> Option<Weekday> {
        Weekday::from_index(self.celeste_day)
    }
}

/// Visitors leave at 5 AM, so before that the previous day's schedule still applies.
///
/// Returns `None` before 5 AM on Sunday, the schedule has already rolled over to the new week.
#[must_use]
pub fn visiting_weekday(weekday: Weekday, hour: u8) -> Option<Weekday> {
    if hour >= 5 {
        Some(weekday)
    } else if weekday == Weekday::Sunday {
        None
    } else {
        Some(weekday.previous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(schedule: &VisitorSchedule) -> Vec<u8> {
        let mut out: Vec<u8> = schedule.npcs.iter().flat_map(|n| n.to_le_bytes()).collect();
        out.resize(WISP_DAY_OFFSET, 0xCD);
        out.extend(schedule.wisp_day.to_le_bytes());
        out.extend(schedule.celeste_day.to_le_bytes());
        out
    }

    fn sample() -> VisitorSchedule {
        VisitorSchedule {
            npcs: [0, 5, 1, 10, 7, 11, 3],
            wisp_day: 2,
            celeste_day: 6,
        }
    }

    #[test]
    fn decodes_layout() {
        let bytes = encode(&sample());
        assert_eq!(bytes.len(), VisitorSchedule::SIZE);
        assert_eq!(VisitorSchedule::decode(&bytes), sample());
    }

    #[test]
    fn extracts_at_version_offset() {
        let mut save = vec![0; 0x42_1000];
        let offset = 0x41_F0B4;
        save[offset..offset + VisitorSchedule::SIZE].copy_from_slice(&encode(&sample()));

        assert_eq!(VisitorSchedule::extract(Version::V170, &save), sample());
        assert_eq!(VisitorSchedule::extract(Version::V180, &save), sample());
        assert_eq!(VisitorSchedule::extract(Version::V160, &save), VisitorSchedule::default());
    }

    #[test]
    fn names() {
        let schedule = sample();
        assert_eq!(
            schedule.visitor_names().unwrap(),
            ["none", "mabel", "gulliver", "redd", "flick", "gullivarrr", "saharah"]
        );
        assert_eq!(schedule.visitor(Weekday::Wednesday).unwrap(), Visitor::Redd);
        assert_eq!(schedule.wisp_weekday(), Some(Weekday::Tuesday));
        assert_eq!(schedule.celeste_weekday(), Some(Weekday::Saturday));
    }

    #[test]
    fn default_schedule_is_empty() {
        let schedule = VisitorSchedule::extract(Version::Unknown, &[]);
        assert_eq!(schedule.visitors().unwrap(), [Visitor::None; 7]);
        assert_eq!(schedule.wisp_day(), 0);
        assert_eq!(schedule.celeste_day(), 0);
    }

    #[test]
    fn unknown_visitor_id() {
        let schedule = VisitorSchedule {
            npcs: [0, 0, 0, 12, 0, 0, 0],
            ..sample()
        };
        assert!(matches!(schedule.visitor_names(), Err(Error::InvalidVisitor(12))));
        assert_eq!(schedule.visitor(Weekday::Monday).unwrap(), Visitor::None);
    }

    #[test]
    fn visiting_day_rolls_over_at_five() {
        assert_eq!(visiting_weekday(Weekday::Tuesday, 4), Some(Weekday::Monday));
        assert_eq!(visiting_weekday(Weekday::Tuesday, 5), Some(Weekday::Tuesday));
        assert_eq!(visiting_weekday(Weekday::Sunday, 2), None);
        assert_eq!(visiting_weekday(Weekday::Sunday, 23), Some(Weekday::Sunday));
    }
}
