use regex::Regex;
use std::sync::OnceLock;

static YEAR_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn year_suffix() -> &'static Regex {
    YEAR_SUFFIX.get_or_init(|| Regex::new(r"\((\d{4})\)\s*$").unwrap())
}

/// Split a raw catalog title like `"Toy Story (1995)"` into the clean
/// title and the release year. Only a trailing `(YYYY)` group is matched;
/// earlier parentheticals stay part of the title. The year is taken as-is,
/// with no range validation. Titles without the suffix come back unchanged.
pub fn parse_title(raw: &str) -> (String, Option<i32>) {
    let re = year_suffix();
    let Some(caps) = re.captures(raw) else {
        return (raw.to_string(), None);
    };

    // Four digits always fit in an i32.
    let year = caps[1].parse::<i32>().ok();
    let clean = re.replace(raw, "").trim().to_string();
    (clean, year)
}
