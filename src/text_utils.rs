use std::ops::Index;

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses the date written in a post header.
///
/// Accepted shapes, only the calendar date is kept:
/// `2022-12-30`, `2022-12-30 10:42`, `2022-12-30 10:42:32.123`,
/// `2022-12-30T10:42:32Z`, `2022-12-30T10:42:32+09:00`
pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$"
        ).unwrap();
    }

    let trimmed = buf.trim();
    let Some(caps) = DATE_REGEX.captures(trimmed) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid calendar date {}", buf));
    };

    // The time is dropped, but a nonsense time still makes the date suspicious
    if let (Some(h), Some(mn)) = (caps.get(4), caps.get(5)) {
        let h = to_u32(h.as_str())?;
        let mn = to_u32(mn.as_str())?;
        let s = match caps.get(6) {
            Some(s) => to_u32(s.as_str())?,
            None => 0,
        };
        if NaiveTime::from_hms_opt(h, mn, s).is_none() {
            return Err(format!("Invalid time in date {}", buf));
        }
    }

    Ok(date)
}

/// Long form used on list cards, e.g. `December 30, 2022`
pub fn format_long_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Turns heading text into a linkable id: whitespace runs become one hyphen,
/// then everything is lowercased.
pub fn anchor_id(text: &str) -> String {
    lazy_static! {
        static ref SPACES_REGEX: Regex = Regex::new(r"\s+").unwrap();
    }
    SPACES_REGEX.replace_all(text, "-").to_lowercase()
}
