use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const ISO_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date of one dataset row, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionDate(Date);

impl SessionDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse an ISO calendar date such as `2020-01-06`.
    pub fn parse(input: &str) -> Result<Self, time::error::Parse> {
        Date::parse(input.trim(), ISO_DATE).map(Self)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub const fn year(self) -> i32 {
        self.0.year()
    }

    pub const fn julian_day(self) -> i32 {
        self.0.to_julian_day()
    }

    pub fn from_julian_day(day: i32) -> Option<Self> {
        Date::from_julian_day(day).ok().map(Self)
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(ISO_DATE)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl From<Date> for SessionDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for SessionDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for SessionDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for SessionDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let parsed = SessionDate::parse("2020-01-06").expect("must parse");
        assert_eq!(parsed.year(), 2020);
        assert_eq!(parsed.to_string(), "2020-01-06");
    }

    #[test]
    fn rejects_non_date() {
        assert!(SessionDate::parse("06/01/2020").is_err());
        assert!(SessionDate::parse("2020-13-01").is_err());
    }

    #[test]
    fn julian_day_round_trips() {
        let parsed = SessionDate::parse("2016-02-29").expect("must parse");
        let back = SessionDate::from_julian_day(parsed.julian_day()).expect("in range");
        assert_eq!(back, parsed);
    }

    #[test]
    fn serializes_as_iso_string() {
        let parsed = SessionDate::parse("2022-03-01").expect("must parse");
        assert_eq!(
            serde_json::to_string(&parsed).expect("serializes"),
            "\"2022-03-01\""
        );
    }
}
