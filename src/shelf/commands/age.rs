//! Stateless date-of-birth utilities: age, age comparison and sun sign.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use chrono::{Datelike, Months, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
}

impl Age {
    /// Calendar age on `today`, or `None` if `dob` is in the future.
    ///
    /// Whole months are counted from `dob` (clamping to month ends, so Jan 31
    /// plus one month is the last day of February); the remainder is days.
    pub fn between(dob: NaiveDate, today: NaiveDate) -> Option<Age> {
        if dob > today {
            return None;
        }

        let span = (today.year() - dob.year()) * 12 + today.month() as i32 - dob.month() as i32;
        let mut months = span.max(0) as u32;
        let anchor = loop {
            match dob.checked_add_months(Months::new(months)) {
                Some(anchor) if anchor <= today => break anchor,
                _ if months > 0 => months -= 1,
                _ => break dob,
            }
        };

        Some(Age {
            years: months / 12,
            months: months % 12,
            days: (today - anchor).num_days() as u32,
            total_days: (today - dob).num_days(),
        })
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} months, {} days ({} days in total)",
            self.years, self.months, self.days, self.total_days
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZodiacSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
}

impl ZodiacSign {
    /// Western sun sign for a birth date.
    pub fn for_date(dob: NaiveDate) -> ZodiacSign {
        use ZodiacSign::*;

        // (first day of the later sign, sign before it, sign from it on)
        let (cutoff, before, after) = match dob.month() {
            1 => (20, Capricorn, Aquarius),
            2 => (18, Aquarius, Pisces),
            3 => (20, Pisces, Aries),
            4 => (20, Aries, Taurus),
            5 => (21, Taurus, Gemini),
            6 => (21, Gemini, Cancer),
            7 => (23, Cancer, Leo),
            8 => (23, Leo, Virgo),
            9 => (23, Virgo, Libra),
            10 => (23, Libra, Scorpio),
            11 => (22, Scorpio, Sagittarius),
            _ => (22, Sagittarius, Capricorn),
        };
        if dob.day() < cutoff {
            before
        } else {
            after
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub fn age(dob: NaiveDate, today: NaiveDate) -> Result<CmdResult<Age>> {
    match Age::between(dob, today) {
        Some(age) => Ok(CmdResult::default()
            .with_listed(vec![age])
            .with_message(CmdMessage::success(format!("Calculated age: {}.", age)))),
        None => Ok(CmdResult::warning(format!(
            "Date of birth {} is in the future.",
            dob
        ))),
    }
}

/// Ages of two people, listed in argument order, plus who is older.
pub fn compare(a: NaiveDate, b: NaiveDate, today: NaiveDate) -> Result<CmdResult<Age>> {
    let (Some(age_a), Some(age_b)) = (Age::between(a, today), Age::between(b, today)) else {
        return Ok(CmdResult::warning("Dates of birth cannot be in the future."));
    };

    let verdict = match a.cmp(&b) {
        Ordering::Less => "Person 1 is older.",
        Ordering::Greater => "Person 2 is older.",
        Ordering::Equal => "Both were born on the same day.",
    };

    Ok(CmdResult::default()
        .with_listed(vec![age_a, age_b])
        .with_message(CmdMessage::info(format!(
            "Person 1 is {} years old and Person 2 is {} years old.",
            age_a.years, age_b.years
        )))
        .with_message(CmdMessage::success(verdict)))
}

pub fn zodiac(dob: NaiveDate) -> Result<CmdResult<ZodiacSign>> {
    let sign = ZodiacSign::for_date(dob);
    Ok(CmdResult::default()
        .with_listed(vec![sign])
        .with_message(CmdMessage::success(format!(
            "Your astrological sign is {}.",
            sign
        ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::test_utils::date;

    #[test]
    fn age_on_birthday() {
        let age = Age::between(date("2000-05-15"), date("2024-05-15")).unwrap();
        assert_eq!((age.years, age.months, age.days), (24, 0, 0));
    }

    #[test]
    fn age_day_before_birthday() {
        let age = Age::between(date("2000-05-15"), date("2024-05-14")).unwrap();
        assert_eq!((age.years, age.months, age.days), (23, 11, 29));
    }

    #[test]
    fn age_borrows_across_short_months() {
        let age = Age::between(date("2024-01-31"), date("2024-03-01")).unwrap();
        assert_eq!((age.years, age.months, age.days), (0, 1, 1));
        assert_eq!(age.total_days, 30);
    }

    #[test]
    fn leap_day_birthday_in_common_year() {
        let age = Age::between(date("2020-02-29"), date("2023-02-28")).unwrap();
        assert_eq!((age.years, age.months, age.days), (3, 0, 0));
    }

    #[test]
    fn future_dob_is_a_warning() {
        let result = age(date("2030-01-01"), date("2024-01-01")).unwrap();
        assert!(result.listed.is_empty());
        assert!(result.has_level(MessageLevel::Warning));
    }

    #[test]
    fn compare_reports_older_person() {
        let today = date("2024-06-01");
        let result = compare(date("1990-01-01"), date("1995-01-01"), today).unwrap();
        assert_eq!(result.listed[0].years, 34);
        assert_eq!(result.listed[1].years, 29);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Person 1 is older."));

        let swapped = compare(date("1995-01-01"), date("1990-01-01"), today).unwrap();
        assert!(swapped
            .messages
            .iter()
            .any(|m| m.content == "Person 2 is older."));
    }

    #[test]
    fn zodiac_cutoffs() {
        assert_eq!(ZodiacSign::for_date(date("2000-01-19")), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::for_date(date("2000-01-20")), ZodiacSign::Aquarius);
        assert_eq!(ZodiacSign::for_date(date("2000-02-18")), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::for_date(date("2000-07-22")), ZodiacSign::Cancer);
        assert_eq!(ZodiacSign::for_date(date("2000-11-22")), ZodiacSign::Sagittarius);
        assert_eq!(ZodiacSign::for_date(date("2000-12-21")), ZodiacSign::Sagittarius);
        assert_eq!(ZodiacSign::for_date(date("2000-12-25")), ZodiacSign::Capricorn);
    }
}
