use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Connection;

use crate::config::DbConfig;
use crate::database::{connection, EMPLOYERS_TABLE, OPENINGS_TABLE};
use crate::error::Result;
use crate::models::employer::EmployerRow;
use crate::models::opening::OpeningRow;
use crate::utils::sql::quote_ident;

const OPENING_COLUMNS: &str =
    "id, name, area_name, salary, employer_id, employer_name, requirement, responsibility";

/// The five read-only queries served from the loaded data. Behind a trait so
/// the pipeline can run against a stand-in.
#[async_trait]
pub trait VacancyReports: Send {
    async fn get_all_employers(&self) -> Result<Vec<EmployerRow>>;
    async fn get_all_vacancies(&self) -> Result<Vec<OpeningRow>>;
    /// `None` when the table is empty or every salary is NULL.
    async fn get_avg_salary(&self) -> Result<Option<Decimal>>;
    async fn get_vacancies_with_higher_salary(&self) -> Result<Vec<OpeningRow>>;
    async fn get_vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<OpeningRow>>;
}

pub struct ReportService {
    config: DbConfig,
    db_name: String,
    employers_table: String,
    openings_table: String,
}

impl ReportService {
    pub fn new(config: DbConfig, db_name: impl Into<String>) -> Self {
        Self {
            config,
            db_name: db_name.into(),
            employers_table: EMPLOYERS_TABLE.to_string(),
            openings_table: OPENINGS_TABLE.to_string(),
        }
    }
}

#[async_trait]
impl VacancyReports for ReportService {
    async fn get_all_employers(&self) -> Result<Vec<EmployerRow>> {
        let mut conn = connection::connect(&self.config, &self.db_name).await?;
        let rows = sqlx::query_as::<_, EmployerRow>(&format!(
            "SELECT id, name, site_url, area_name, industries_name, open_vacancies FROM {}",
            quote_ident(&self.employers_table)
        ))
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(rows)
    }

    async fn get_all_vacancies(&self) -> Result<Vec<OpeningRow>> {
        let mut conn = connection::connect(&self.config, &self.db_name).await?;
        let rows = sqlx::query_as::<_, OpeningRow>(&format!(
            "SELECT {} FROM {}",
            OPENING_COLUMNS,
            quote_ident(&self.openings_table)
        ))
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(rows)
    }

    async fn get_avg_salary(&self) -> Result<Option<Decimal>> {
        let mut conn = connection::connect(&self.config, &self.db_name).await?;
        let avg = sqlx::query_scalar::<_, Option<Decimal>>(&format!(
            "SELECT AVG(salary) FROM {}",
            quote_ident(&self.openings_table)
        ))
        .fetch_one(&mut conn)
        .await?;
        conn.close().await?;
        Ok(avg)
    }

    async fn get_vacancies_with_higher_salary(&self) -> Result<Vec<OpeningRow>> {
        let openings = quote_ident(&self.openings_table);
        let mut conn = connection::connect(&self.config, &self.db_name).await?;
        let rows = sqlx::query_as::<_, OpeningRow>(&format!(
            "SELECT {} FROM {} WHERE salary > (SELECT AVG(salary) FROM {})",
            OPENING_COLUMNS, openings, openings
        ))
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(rows)
    }

    async fn get_vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<OpeningRow>> {
        let pattern = format!("%{}%", keyword);
        let mut conn = connection::connect(&self.config, &self.db_name).await?;
        let rows = sqlx::query_as::<_, OpeningRow>(&format!(
            "SELECT {} FROM {} \
             WHERE name ILIKE $1 OR requirement ILIKE $1 OR responsibility ILIKE $1",
            OPENING_COLUMNS,
            quote_ident(&self.openings_table)
        ))
        .bind(&pattern)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(rows)
    }
}
