use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

use super::display_or_dash;
use super::extract::{extract_fields, take_i64, take_string, EMPLOYER_KEYS};

fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid employer id: {}", s))),
    }
}

/// One entry of the employer seed file. Ids arrive as numbers or digit
/// strings depending on where the file came from.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeedEmployer {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Employer record flattened out of the raw API shape. Every field is
/// optional; absent source keys arrive as nulls and the target columns
/// tolerate them (or reject the row at insert time where they do not).
#[derive(Debug, Clone, PartialEq)]
pub struct Employer {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub site_url: Option<String>,
    pub area_name: Option<String>,
    pub industries_name: Option<String>,
    pub open_vacancies: Option<i64>,
}

impl Employer {
    pub fn from_item(item: &Value) -> Self {
        let mut fields = extract_fields(item, EMPLOYER_KEYS);
        Self {
            id: take_i64(&mut fields, "id"),
            name: take_string(&mut fields, "name"),
            site_url: take_string(&mut fields, "site_url"),
            area_name: take_string(&mut fields, "area_name"),
            industries_name: take_string(&mut fields, "industries_name"),
            open_vacancies: take_i64(&mut fields, "open_vacancies"),
        }
    }
}

/// Row of the employers table as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmployerRow {
    pub id: i32,
    pub name: String,
    pub site_url: Option<String>,
    pub area_name: Option<String>,
    pub industries_name: Option<String>,
    pub open_vacancies: Option<i32>,
}

impl fmt::Display for EmployerRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} | {}",
            self.id,
            self.name,
            display_or_dash(&self.site_url),
            display_or_dash(&self.area_name),
            display_or_dash(&self.industries_name),
            display_or_dash(&self.open_vacancies),
        )
    }
}
