use lineage_core::config::StyleConfig;
use lineage_core::dates::format_date_range;
use lineage_core::{Gender, Person};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub surname: Option<String>,
    pub dates: String,
    pub color: String,
}

impl Tooltip {
    pub fn for_person(person: &Person, style: &StyleConfig) -> Self {
        Self {
            name: person.display_name().to_string(),
            surname: person.surname.clone(),
            dates: format_date_range(person.birth_date.as_deref(), person.death_date.as_deref()),
            color: gender_color(person.gender, style).to_string(),
        }
    }

    /// One line per present field.
    pub fn text(&self) -> String {
        let mut lines: Vec<&str> = vec![self.name.as_str()];
        if let Some(s) = self.surname.as_deref() {
            lines.push(s);
        }
        if !self.dates.is_empty() {
            lines.push(&self.dates);
        }
        lines.join("\n")
    }
}

pub fn gender_color(gender: Gender, style: &StyleConfig) -> &str {
    match gender {
        Gender::Male => &style.male_color,
        Gender::Female => &style.female_color,
        Gender::Unknown => &style.unknown_color,
    }
}
