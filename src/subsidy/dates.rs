//! Calendar-date parsing for deadline input.
//!
//! `parse_strict` accepts ISO 8601 dates and date-times only; `parse_lenient`
//! accepts the human formats people type into forms. [`parse_deadline`]
//! tries strict first.

use lazy_static::lazy_static;
use regex::Regex;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, Month, OffsetDateTime, PrimitiveDateTime,
};

const ISO_DATETIMES: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

// Month-first numeric forms are tried before day-first ones; an impossible
// month (e.g. 31/05/2024) falls through to the day-first variant.
const HUMAN_DATES: &[&[FormatItem<'static>]] = &[
    format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]"),
    format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]"),
    format_description!("[month repr:long case_sensitive:false] [day padding:none] [year]"),
    format_description!("[month repr:short case_sensitive:false] [day padding:none] [year]"),
    format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
    format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
    format_description!("[day padding:none] [month repr:long case_sensitive:false], [year]"),
    format_description!("[day padding:none]-[month repr:short case_sensitive:false]-[year]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[day padding:none]/[month padding:none]/[year]"),
    format_description!("[month padding:none]-[day padding:none]-[year]"),
    format_description!("[day padding:none]-[month padding:none]-[year]"),
    format_description!("[day padding:none].[month padding:none].[year]"),
];

lazy_static! {
    static ref ORDINAL_RE: Regex = Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap();
    static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// ISO 8601: `YYYY-MM-DD`, a naive date-time, or an RFC 3339 timestamp.
/// Only the calendar date is kept.
pub fn parse_strict(input: &str) -> Option<Date> {
    let s = input.trim();
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt.date());
    }
    if let Ok(d) = Date::parse(s, ISO_DATE) {
        return Some(d);
    }
    ISO_DATETIMES
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Month names, abbreviations, ordinals ("31st") and slash/dash/dot numeric
/// dates.
pub fn parse_lenient(input: &str) -> Option<Date> {
    let s = SPACES_RE.replace_all(input.trim(), " ");
    let s = ORDINAL_RE.replace_all(&s, "$1");
    let s = s.trim_end_matches('.');
    HUMAN_DATES.iter().find_map(|fmt| Date::parse(s, fmt).ok())
}

pub fn parse_deadline(input: &str) -> Option<Date> {
    parse_strict(input).or_else(|| parse_lenient(input))
}

/// Maps a full or abbreviated English month name onto [`Month`].
pub fn month_from_name(name: &str) -> Option<Month> {
    let key = name.trim().trim_end_matches('.').to_lowercase();
    let key = key.get(..3)?;
    let month = match key {
        "jan" => Month::January,
        "feb" => Month::February,
        "mar" => Month::March,
        "apr" => Month::April,
        "may" => Month::May,
        "jun" => Month::June,
        "jul" => Month::July,
        "aug" => Month::August,
        "sep" => Month::September,
        "oct" => Month::October,
        "nov" => Month::November,
        "dec" => Month::December,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn strict_accepts_iso_forms() {
        assert_eq!(parse_strict("2024-05-31"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_strict(" 2024-05-31 "), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_strict("2024-05-31T10:30"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_strict("2024-05-31 10:30:00"), Some(date!(2024 - 05 - 31)));
        assert_eq!(
            parse_strict("2024-05-31T23:59:59.250"),
            Some(date!(2024 - 05 - 31))
        );
        assert_eq!(
            parse_strict("2024-05-31T23:30:00+05:30"),
            Some(date!(2024 - 05 - 31))
        );
        assert_eq!(parse_strict("2024-05-31T10:00:00Z"), Some(date!(2024 - 05 - 31)));
    }

    #[test]
    fn strict_rejects_human_forms_and_impossible_dates() {
        assert_eq!(parse_strict("May 31, 2024"), None);
        assert_eq!(parse_strict("31/05/2024"), None);
        assert_eq!(parse_strict("2024-02-30"), None);
        assert_eq!(parse_strict("2024-5-31"), None);
        assert_eq!(parse_strict(""), None);
    }

    #[test]
    fn lenient_accepts_month_names() {
        assert_eq!(parse_lenient("May 31, 2024"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("march 5, 2025"), Some(date!(2025 - 03 - 05)));
        assert_eq!(parse_lenient("Mar 5 2025"), Some(date!(2025 - 03 - 05)));
        assert_eq!(parse_lenient("31 May 2024"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("31st  May   2024"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("1 Sep 2024"), Some(date!(2024 - 09 - 01)));
        assert_eq!(parse_lenient("15-Aug-2024"), Some(date!(2024 - 08 - 15)));
    }

    #[test]
    fn lenient_numeric_is_month_first_then_day_first() {
        assert_eq!(parse_lenient("03/05/2024"), Some(date!(2024 - 03 - 05)));
        assert_eq!(parse_lenient("31/05/2024"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("2024/5/31"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("2024-5-31"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_lenient("31.05.2024"), Some(date!(2024 - 05 - 31)));
    }

    #[test]
    fn deadline_parser_falls_back_and_rejects_garbage() {
        assert_eq!(parse_deadline("2024-05-31"), Some(date!(2024 - 05 - 31)));
        assert_eq!(parse_deadline("June 30, 2025"), Some(date!(2025 - 06 - 30)));
        assert_eq!(parse_deadline("2024-5-1"), Some(date!(2024 - 05 - 01)));
        assert_eq!(parse_deadline("next tuesday"), None);
        assert_eq!(parse_deadline("February 30, 2024"), None);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_from_name("SEPTEMBER"), Some(Month::September));
        assert_eq!(month_from_name("Sept."), Some(Month::September));
        assert_eq!(month_from_name("ma"), None);
        assert_eq!(month_from_name("Smarch"), None);
    }
}
