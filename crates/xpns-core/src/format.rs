use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Accepts BCP 47 style tags (`de`, `de-AT`, `en_US`); unknown ones fall
    /// back to German.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Self::En,
            _ => Self::De,
        }
    }

    fn separators(self) -> (char, char) {
        match self {
            Self::De => ('.', ','),
            Self::En => (',', '.'),
        }
    }
}

const DE_WEEKDAYS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];
const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const DE_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];
const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn weekday_name(date: NaiveDate, locale: Locale) -> &'static str {
    let idx = date.weekday().num_days_from_monday() as usize;
    match locale {
        Locale::De => DE_WEEKDAYS[idx],
        Locale::En => EN_WEEKDAYS[idx],
    }
}

fn month_name(date: NaiveDate, locale: Locale) -> &'static str {
    let idx = date.month0() as usize;
    match locale {
        Locale::De => DE_MONTHS[idx],
        Locale::En => EN_MONTHS[idx],
    }
}

/// Two decimals with digit grouping: `1.234,50` / `1,234.50`.
pub fn render_float(value: f64, locale: Locale) -> String {
    let (group_sep, decimal_sep) = locale.separators();
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}{decimal_sep}{frac_part}")
}

/// Short label used in tables: `Fr 16.10.` / `Fri 10/16`.
pub fn render_day(date: NaiveDate, locale: Locale) -> String {
    let weekday: String = weekday_name(date, locale).chars().take(2).collect();
    match locale {
        Locale::De => format!("{weekday} {:02}.{:02}.", date.day(), date.month()),
        Locale::En => {
            let weekday: String = weekday_name(date, locale).chars().take(3).collect();
            format!("{weekday} {:02}/{:02}", date.month(), date.day())
        }
    }
}

/// Long heading: `Freitag, 16. Oktober 2026` / `Friday, October 16, 2026`.
pub fn render_day_heading(date: NaiveDate, locale: Locale) -> String {
    let weekday = weekday_name(date, locale);
    let month = month_name(date, locale);
    match locale {
        Locale::De => format!("{weekday}, {}. {month} {}", date.day(), date.year()),
        Locale::En => format!("{weekday}, {month} {}, {}", date.day(), date.year()),
    }
}

pub fn render_month(date: NaiveDate, locale: Locale) -> String {
    format!("{} {}", month_name(date, locale), date.year())
}

pub fn weekday_abbreviations(locale: Locale) -> Vec<String> {
    let names = match locale {
        Locale::De => DE_WEEKDAYS,
        Locale::En => EN_WEEKDAYS,
    };
    names.iter().map(|name| name.chars().take(2).collect()).collect()
}

pub fn to_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
