use serde_json::Value;
use sqlx::FromRow;
use std::fmt;

use super::display_or_dash;
use super::extract::{extract_fields, take_i64, take_string, OPENING_KEYS};

/// Vacancy record flattened out of the raw API shape. `salary` is the single
/// collapsed bound (upper preferred), not the raw range object.
#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub area_name: Option<String>,
    pub salary: Option<i64>,
    pub employer_id: Option<i64>,
    pub employer_name: Option<String>,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

impl Opening {
    pub fn from_item(item: &Value) -> Self {
        let mut fields = extract_fields(item, OPENING_KEYS);
        Self {
            id: take_i64(&mut fields, "id"),
            name: take_string(&mut fields, "name"),
            area_name: take_string(&mut fields, "area_name"),
            salary: take_i64(&mut fields, "salary"),
            employer_id: take_i64(&mut fields, "employer_id"),
            employer_name: take_string(&mut fields, "employer_name"),
            requirement: take_string(&mut fields, "requirement"),
            responsibility: take_string(&mut fields, "responsibility"),
        }
    }
}

/// Row of the openings table as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OpeningRow {
    pub id: i64,
    pub name: String,
    pub area_name: String,
    pub salary: Option<i32>,
    pub employer_id: Option<i32>,
    pub employer_name: String,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

impl fmt::Display for OpeningRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} | {} | {} | {}",
            self.id,
            self.name,
            self.area_name,
            display_or_dash(&self.salary),
            display_or_dash(&self.employer_id),
            self.employer_name,
            display_or_dash(&self.requirement),
            display_or_dash(&self.responsibility),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> Value {
        json!({
            "id": "93353083",
            "premium": false,
            "name": "Junior Python Developer",
            "area": {"id": "1", "name": "Москва"},
            "salary": {"from": 100000, "to": 150000, "currency": "RUR", "gross": false},
            "employer": {"id": "1740", "name": "Яндекс", "trusted": true},
            "snippet": {
                "requirement": "Знание Python, SQL. Опыт от 1 года.",
                "responsibility": "Разработка и поддержка сервисов."
            },
            "schedule": {"id": "remote", "name": "Удаленная работа"}
        })
    }

    #[test]
    fn from_item_flattens_vacancy_payload() {
        let opening = Opening::from_item(&sample_item());
        assert_eq!(
            opening,
            Opening {
                id: Some(93353083),
                name: Some("Junior Python Developer".to_string()),
                area_name: Some("Москва".to_string()),
                salary: Some(150000),
                employer_id: Some(1740),
                employer_name: Some("Яндекс".to_string()),
                requirement: Some("Знание Python, SQL. Опыт от 1 года.".to_string()),
                responsibility: Some("Разработка и поддержка сервисов.".to_string()),
            }
        );
    }

    #[test]
    fn from_item_maps_missing_salary_and_snippet_to_none() {
        let item = json!({
            "id": "93353084",
            "name": "Backend Developer",
            "area": {"name": "Санкт-Петербург"},
            "salary": null,
            "employer": {"id": "3529", "name": "Сбер"},
            "snippet": {"requirement": null, "responsibility": null}
        });

        let opening = Opening::from_item(&item);
        assert_eq!(opening.salary, None);
        assert_eq!(opening.requirement, None);
        assert_eq!(opening.responsibility, None);
        assert_eq!(opening.employer_id, Some(3529));
    }

    #[test]
    fn display_substitutes_dashes_for_missing_values() {
        let row = OpeningRow {
            id: 1,
            name: "Dev".to_string(),
            area_name: "Москва".to_string(),
            salary: None,
            employer_id: Some(1740),
            employer_name: "Яндекс".to_string(),
            requirement: None,
            responsibility: None,
        };
        assert_eq!(row.to_string(), "1 | Dev | Москва | - | 1740 | Яндекс | - | -");
    }
}
