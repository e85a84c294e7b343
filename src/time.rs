//! Calendar values: TOML dates, times and date-times.
//!
//! A [`DateTime`] is stored at microsecond granularity and compares by its
//! [timestamp](DateTime::timestamp), a signed count of microseconds since
//! `0000-01-01T00:00:00` UTC in the proleptic Gregorian calendar.

#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

use crate::{Error, ErrorKind, Span};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const MICROS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_400_YEARS: i64 = 146_097;

/// Which of the four TOML date/time forms a [`DateTime`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    /// `1979-05-27`
    LocalDate,
    /// `07:32:00`
    LocalTime,
    /// `1979-05-27T07:32:00`
    LocalDateTime,
    /// `1979-05-27T07:32:00Z`, `1979-05-27T00:32:00-07:00`
    OffsetDateTime,
}

impl DateTimeKind {
    #[inline]
    pub fn has_date(self) -> bool {
        !matches!(self, Self::LocalTime)
    }

    #[inline]
    pub fn has_time(self) -> bool {
        !matches!(self, Self::LocalDate)
    }

    #[inline]
    pub fn has_offset(self) -> bool {
        matches!(self, Self::OffsetDateTime)
    }
}

/// A TOML calendar value.
///
/// Fields that are not meaningful for the [`kind`](Self::kind) (the date of a
/// [`LocalTime`](DateTimeKind::LocalTime), the offset of anything but an
/// [`OffsetDateTime`](DateTimeKind::OffsetDateTime)) are zero after parsing
/// and are ignored by formatting and comparison.
///
/// The offset is split into signed hour and minute parts that share a sign:
/// `-05:30` is `offset_hour = -5, offset_minute = -30`. An offset date-time
/// with both parts zero is UTC and formats with a `Z`.
///
/// Equality, ordering and hashing all go through [`timestamp`](Self::timestamp),
/// so `1979-05-27T07:32:00Z` equals `1979-05-27T00:32:00-07:00`.
///
/// # Examples
///
/// ```
/// use toml_decoder::{DateTime, DateTimeKind};
///
/// let dt: DateTime = "1979-05-27T00:32:00.5-07:00".parse()?;
/// assert_eq!(dt.kind, DateTimeKind::OffsetDateTime);
/// assert_eq!(dt.microsecond, 500_000);
/// assert_eq!(dt.to_string(), "1979-05-27T00:32:00.500000-07:00");
/// assert_eq!(dt, "1979-05-27T07:32:00.5Z".parse()?);
/// # Ok::<(), toml_decoder::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DateTime {
    pub kind: DateTimeKind,
    pub year: i32,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59, leap seconds are not modeled.
    pub second: u8,
    /// 0-999999
    pub microsecond: u32,
    pub offset_hour: i8,
    pub offset_minute: i8,
}

/// A numeric field of a [`DateTime`], addressable by name or by 1-based
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
    OffsetHour,
    OffsetMinute,
}

impl Field {
    /// All fields in positional order.
    pub const ALL: [Field; 9] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Microsecond,
        Field::OffsetHour,
        Field::OffsetMinute,
    ];

    /// Looks a field up by name. `fraction` is accepted for
    /// [`Microsecond`](Field::Microsecond).
    pub fn from_name(name: &str) -> Option<Field> {
        Some(match name {
            "year" => Field::Year,
            "month" => Field::Month,
            "day" => Field::Day,
            "hour" => Field::Hour,
            "minute" => Field::Minute,
            "second" => Field::Second,
            "microsecond" | "fraction" => Field::Microsecond,
            "offset_hour" => Field::OffsetHour,
            "offset_minute" => Field::OffsetMinute,
            _ => return None,
        })
    }

    /// Looks a field up by its 1-based position in [`Field::ALL`].
    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index.checked_sub(1)?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Microsecond => "microsecond",
            Field::OffsetHour => "offset_hour",
            Field::OffsetMinute => "offset_minute",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

pub(crate) fn days_in_month(year: i64, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

/// Number of multiples of `k` in `[0, n)`, negative when `n` is.
fn multiples_below(n: i64, k: i64) -> i64 {
    (n + k - 1).div_euclid(k)
}

/// Days from `0000-01-01` to the given date. Out-of-range months and days
/// carry into the neighbouring year or month.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    const BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let year = year + (month - 1).div_euclid(12);
    let month = (month - 1).rem_euclid(12) as usize;

    let leap_days =
        multiples_below(year, 4) - multiples_below(year, 100) + multiples_below(year, 400);
    let mut days = year * 365 + leap_days + BEFORE_MONTH[month];
    if month > 1 && is_leap_year(year) {
        days += 1;
    }
    days + day - 1
}

impl Default for DateTime {
    /// `0000-01-01T00:00:00Z`
    fn default() -> Self {
        DateTime {
            kind: DateTimeKind::OffsetDateTime,
            ..DateTime::from_timestamp(0)
        }
    }
}

impl DateTime {
    /// Parses a complete TOML date/time literal.
    pub fn parse(text: &str) -> Result<DateTime, Error> {
        match DateTime::munch(text.as_bytes()) {
            Some((consumed, value)) if consumed == text.len() => Ok(value),
            _ => Err(Error::from((
                ErrorKind::InvalidDateTime,
                Span::new(0, text.len() as u32),
            ))),
        }
    }

    /// Parses the longest date/time prefix of `input`, returning the number
    /// of bytes consumed.
    pub(crate) fn munch(input: &[u8]) -> Option<(usize, DateTime)> {
        enum State {
            Year,
            Month,
            Day,
            Hour,
            Minute,
            Second,
            Frac,
            OffHour,
            OffMin,
        }
        let mut state = match input {
            [_, _, _, _, b'-', ..] => State::Year,
            [_, _, b':', ..] => State::Hour,
            _ => return None,
        };

        let mut value = DateTime {
            kind: DateTimeKind::LocalTime,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            microsecond: 0,
            offset_hour: 0,
            offset_minute: 0,
        };
        let mut has_date = false;
        let mut has_offset = false;

        let mut current = 0u32;
        let mut len = 0u32;
        let mut off_sign: i8 = 1;
        let mut i = 0usize;
        let mut valid = false;

        'outer: loop {
            let byte = input.get(i).copied().unwrap_or(0);
            if byte.is_ascii_digit() {
                len += 1;
                if len <= 9 {
                    current = current * 10 + (byte - b'0') as u32;
                }
                i += 1;
                continue;
            }
            'next: {
                match state {
                    State::Year => {
                        if len != 4 || byte != b'-' {
                            break 'outer;
                        }
                        value.year = current as i32;
                        state = State::Month;
                        break 'next;
                    }
                    State::Month => {
                        let m = current as u8;
                        if len != 2 || byte != b'-' || m < 1 || m > 12 {
                            break 'outer;
                        }
                        value.month = m;
                        state = State::Day;
                        break 'next;
                    }
                    State::Day => {
                        let d = current as u8;
                        if len != 2
                            || d < 1
                            || d > days_in_month(value.year as i64, value.month)
                        {
                            break 'outer;
                        }
                        value.day = d;
                        has_date = true;
                        if byte == b'T'
                            || byte == b't'
                            || (byte == b' '
                                && input.get(i + 1).is_some_and(|b| b.is_ascii_digit()))
                        {
                            state = State::Hour;
                            break 'next;
                        }
                        valid = true;
                        break 'outer;
                    }
                    State::Hour => {
                        let h = current as u8;
                        if len != 2 || byte != b':' || h > 23 {
                            break 'outer;
                        }
                        value.hour = h;
                        state = State::Minute;
                        break 'next;
                    }
                    State::Minute => {
                        let m = current as u8;
                        if len != 2 || byte != b':' || m > 59 {
                            break 'outer;
                        }
                        value.minute = m;
                        state = State::Second;
                        break 'next;
                    }
                    State::Second => {
                        let s = current as u8;
                        if len != 2 || s > 59 {
                            break 'outer;
                        }
                        value.second = s;
                        if byte == b'.' {
                            state = State::Frac;
                            break 'next;
                        }
                        // fallthrough to the offset check
                    }
                    State::Frac => {
                        if len == 0 || len > 9 {
                            break 'outer;
                        }
                        // Only microseconds are kept: truncate or pad to 6 digits.
                        value.microsecond = if len >= 6 {
                            current / 10u32.pow(len - 6)
                        } else {
                            current * 10u32.pow(6 - len)
                        };
                        // fallthrough to the offset check
                    }
                    State::OffHour => {
                        if len != 2 || byte != b':' || current > 23 {
                            break 'outer;
                        }
                        value.offset_hour = off_sign * current as i8;
                        state = State::OffMin;
                        break 'next;
                    }
                    State::OffMin => {
                        if len != 2 || current > 59 {
                            break 'outer;
                        }
                        value.offset_minute = off_sign * current as i8;
                        has_offset = true;
                        valid = true;
                        break 'outer;
                    }
                }
                match byte {
                    b'Z' | b'z' => {
                        has_offset = true;
                        i += 1;
                        valid = true;
                        break 'outer;
                    }
                    b'+' => {
                        off_sign = 1;
                        state = State::OffHour;
                    }
                    b'-' => {
                        off_sign = -1;
                        state = State::OffHour;
                    }
                    _ => {
                        valid = true;
                        break 'outer;
                    }
                }
            }
            i += 1;
            current = 0;
            len = 0;
        }

        if !valid || (!has_date && has_offset) {
            return None;
        }
        // A literal that ends while still in the day state has no time part.
        let has_time = !matches!(state, State::Day);
        value.kind = match (has_date, has_time, has_offset) {
            (false, _, _) => DateTimeKind::LocalTime,
            (true, false, _) => DateTimeKind::LocalDate,
            (true, true, false) => DateTimeKind::LocalDateTime,
            (true, true, true) => DateTimeKind::OffsetDateTime,
        };
        Some((i, value))
    }

    /// Microseconds since `0000-01-01T00:00:00` UTC.
    ///
    /// The offset is subtracted to reach UTC, and fields outside their
    /// natural range carry into the next larger unit, so `01:75` on a given
    /// day counts as `02:15`.
    pub fn timestamp(&self) -> i64 {
        let (year, month, day) = if self.kind.has_date() {
            (self.year as i64, self.month as i64, self.day as i64)
        } else {
            (0, 1, 1)
        };
        let (hour, minute, second, micros) = if self.kind.has_time() {
            (
                self.hour as i64,
                self.minute as i64,
                self.second as i64,
                self.microsecond as i64,
            )
        } else {
            (0, 0, 0, 0)
        };
        let offset = if self.kind.has_offset() {
            self.offset_hour as i64 * 3600 + self.offset_minute as i64 * 60
        } else {
            0
        };

        let days = days_from_civil(year, month, day);
        let seconds = days
            .saturating_mul(SECONDS_PER_DAY)
            .saturating_add(hour * 3600 + minute * 60 + second - offset);
        seconds
            .saturating_mul(MICROS_PER_SECOND)
            .saturating_add(micros)
    }

    /// Inverse of [`timestamp`](Self::timestamp), producing a
    /// [`LocalDateTime`](DateTimeKind::LocalDateTime) in UTC.
    pub fn from_timestamp(timestamp: i64) -> DateTime {
        let microsecond = timestamp.rem_euclid(MICROS_PER_SECOND) as u32;
        let seconds = timestamp.div_euclid(MICROS_PER_SECOND);
        let mut days = seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);

        // Whole 400-year cycles first, then walk the remaining years one at a
        // time.
        let mut year = days.div_euclid(DAYS_PER_400_YEARS) * 400;
        days = days.rem_euclid(DAYS_PER_400_YEARS);
        loop {
            let len = if is_leap_year(year) { 366 } else { 365 };
            if days < len {
                break;
            }
            days -= len;
            year += 1;
        }
        let mut month = 1u8;
        loop {
            let len = days_in_month(year, month) as i64;
            if days < len {
                break;
            }
            days -= len;
            month += 1;
        }

        DateTime {
            kind: DateTimeKind::LocalDateTime,
            year: year as i32,
            month,
            day: days as u8 + 1,
            hour: (second_of_day / 3600) as u8,
            minute: (second_of_day % 3600 / 60) as u8,
            second: (second_of_day % 60) as u8,
            microsecond,
            offset_hour: 0,
            offset_minute: 0,
        }
    }

    /// Builds a value starting from [`DateTime::default`] and assigning each
    /// field in turn.
    pub fn from_fields<I>(fields: I) -> Result<DateTime, Error>
    where
        I: IntoIterator<Item = (Field, i64)>,
    {
        let mut value = DateTime::default();
        for (field, v) in fields {
            value.set(field, v)?;
        }
        Ok(value)
    }

    pub fn get(&self, field: Field) -> i64 {
        match field {
            Field::Year => self.year as i64,
            Field::Month => self.month as i64,
            Field::Day => self.day as i64,
            Field::Hour => self.hour as i64,
            Field::Minute => self.minute as i64,
            Field::Second => self.second as i64,
            Field::Microsecond => self.microsecond as i64,
            Field::OffsetHour => self.offset_hour as i64,
            Field::OffsetMinute => self.offset_minute as i64,
        }
    }

    /// Assigns a field. Values outside the natural range are accepted as long
    /// as they fit the field's storage; they are normalized by
    /// [`timestamp`](Self::timestamp).
    pub fn set(&mut self, field: Field, value: i64) -> Result<(), Error> {
        fn fit<T: TryFrom<i64>>(field: Field, value: i64) -> Result<T, Error> {
            T::try_from(value).map_err(|_| {
                Error::from((
                    ErrorKind::InvalidField(format!("{field} = {value}")),
                    Span::default(),
                ))
            })
        }
        match field {
            Field::Year => self.year = fit(field, value)?,
            Field::Month => self.month = fit(field, value)?,
            Field::Day => self.day = fit(field, value)?,
            Field::Hour => self.hour = fit(field, value)?,
            Field::Minute => self.minute = fit(field, value)?,
            Field::Second => self.second = fit(field, value)?,
            Field::Microsecond => self.microsecond = fit(field, value)?,
            Field::OffsetHour => self.offset_hour = fit(field, value)?,
            Field::OffsetMinute => self.offset_minute = fit(field, value)?,
        }
        Ok(())
    }

    /// Sets a field by name, see [`Field::from_name`].
    pub fn set_by_name(&mut self, name: &str, value: i64) -> Result<(), Error> {
        match Field::from_name(name) {
            Some(field) => self.set(field, value),
            None => Err(Error::from((
                ErrorKind::InvalidField(name.to_owned()),
                Span::default(),
            ))),
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<i64> {
        Field::from_name(name).map(|field| self.get(field))
    }

    /// Reads a field by 1-based position, see [`Field::from_index`].
    pub fn get_by_index(&self, index: usize) -> Option<i64> {
        Field::from_index(index).map(|field| self.get(field))
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse(s)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.has_date() {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
            if self.kind.has_time() {
                f.write_str("T")?;
            }
        }
        if self.kind.has_time() {
            write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
            if self.microsecond != 0 {
                write!(f, ".{:06}", self.microsecond)?;
            }
        }
        if self.kind.has_offset() {
            if self.offset_hour == 0 && self.offset_minute == 0 {
                f.write_str("Z")?;
            } else {
                let sign = if self.offset_hour < 0 || self.offset_minute < 0 {
                    '-'
                } else {
                    '+'
                };
                write!(
                    f,
                    "{sign}{:02}:{:02}",
                    self.offset_hour.unsigned_abs(),
                    self.offset_minute.unsigned_abs()
                )?;
            }
        }
        Ok(())
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp() == other.timestamp()
    }
}

impl Eq for DateTime {}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp().cmp(&other.timestamp())
    }
}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.timestamp().hash(state);
    }
}

impl From<DateTime> for i64 {
    fn from(value: DateTime) -> i64 {
        value.timestamp()
    }
}

impl From<i64> for DateTime {
    fn from(timestamp: i64) -> DateTime {
        DateTime::from_timestamp(timestamp)
    }
}
