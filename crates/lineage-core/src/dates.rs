use chrono::NaiveDate;

/// `YYYY-MM-DD` becomes `DD.MM.YYYY`; anything else (a bare year, "ca. 1890") is kept verbatim.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    // Spreadsheet exports sometimes carry a midnight time component.
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => d.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `birth – death`, `birth`, or `† death`; empty when neither is known.
pub fn format_date_range(birth: Option<&str>, death: Option<&str>) -> String {
    let birth = birth.map(str::trim).filter(|s| !s.is_empty());
    let death = death.map(str::trim).filter(|s| !s.is_empty());
    match (birth, death) {
        (Some(b), Some(d)) => format!("{} – {}", format_date(b), format_date(d)),
        (Some(b), None) => format_date(b),
        (None, Some(d)) => format!("† {}", format_date(d)),
        (None, None) => String::new(),
    }
}
