//! Fixed national-holiday calendar
//!
//! Fixed (month, day) dates only; movable religious holidays are out of
//! scope and belong to the external collaborator that owns calendars.

use chrono::{Datelike, NaiveDate};

/// The fixed-date national holidays
const FIXED_HOLIDAYS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (4, 23, "National Sovereignty and Children's Day"),
    (5, 1, "Labour and Solidarity Day"),
    (5, 19, "Commemoration of Atatürk, Youth and Sports Day"),
    (7, 15, "Democracy and National Unity Day"),
    (8, 30, "Victory Day"),
    (10, 29, "Republic Day"),
];

/// Lookup table for fixed-date national holidays
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar;

impl HolidayCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Returns the holiday name when (month, day) is a fixed holiday
    pub fn holiday_for(&self, month: u32, day: u32) -> Option<&'static str> {
        FIXED_HOLIDAYS
            .iter()
            .find(|(m, d, _)| *m == month && *d == day)
            .map(|(_, _, name)| *name)
    }

    pub fn holiday_on(&self, date: NaiveDate) -> Option<&'static str> {
        self.holiday_for(date.month(), date.day())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }
}
