use async_trait::async_trait;
use console::style;
use sqlx::Connection;

use crate::config::DbConfig;
use crate::database::{connection, EMPLOYERS_TABLE, OPENINGS_TABLE};
use crate::error::Result;
use crate::models::employer::Employer;
use crate::models::opening::Opening;
use crate::utils::prompt;
use crate::utils::sql::quote_ident;

/// Write side of the storage layer: database and table creation plus the
/// bulk insert. Kept behind a trait so the pipeline can run against a
/// stand-in.
#[async_trait]
pub trait VacancyStore: Send {
    /// Creates `name`, dropping an existing database of that name after an
    /// interactive confirmation. Placeholder names and a declined
    /// confirmation are no-ops.
    async fn create_database(&mut self, name: &str) -> Result<()>;

    async fn create_tables(&mut self, employers_table: &str, openings_table: &str) -> Result<()>;

    /// Inserts both record lists in one transaction; any constraint
    /// violation rolls the whole batch back.
    async fn insert_values(&self, employers: &[Employer], openings: &[Opening]) -> Result<()>;
}

/// Decides whether an existing database may be dropped and recreated.
pub type ConfirmFn = Box<dyn Fn(&str) -> Result<bool> + Send + Sync>;

pub struct LoaderService {
    config: DbConfig,
    db_name: Option<String>,
    employers_table: String,
    openings_table: String,
    assume_yes: bool,
    confirm: ConfirmFn,
}

impl LoaderService {
    pub fn new(config: DbConfig, assume_yes: bool) -> Self {
        Self::with_confirm(
            config,
            assume_yes,
            Box::new(|message| prompt::confirm(message, false)),
        )
    }

    /// Replaces the interactive confirmation so the destructive-recreate
    /// decision can be scripted.
    pub fn with_confirm(config: DbConfig, assume_yes: bool, confirm: ConfirmFn) -> Self {
        Self {
            config,
            db_name: None,
            employers_table: EMPLOYERS_TABLE.to_string(),
            openings_table: OPENINGS_TABLE.to_string(),
            assume_yes,
            confirm,
        }
    }
}

/// Names that mean "nothing was chosen": empty strings and the literal
/// "none" that shows up when a shell variable was left unset.
fn is_placeholder(name: &str) -> bool {
    let normalized = name.trim().to_lowercase();
    normalized.is_empty() || normalized == "none"
}

#[async_trait]
impl VacancyStore for LoaderService {
    async fn create_database(&mut self, name: &str) -> Result<()> {
        if is_placeholder(name) {
            println!("{}", style("Database name should not be empty").yellow());
            return Ok(());
        }

        let mut conn = connection::connect_maintenance(&self.config).await?;
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM pg_database WHERE datname = $1")
            .bind(name)
            .fetch_optional(&mut conn)
            .await?
            .is_some();

        if exists {
            println!("Database '{}' already exists.", name);
            let recreate = self.assume_yes
                || (self.confirm)(&format!("Delete '{}' and create a new one?", name))?;
            if !recreate {
                println!("{}", style("Operation cancelled").yellow());
                conn.close().await?;
                return Ok(());
            }

            sqlx::query(
                "SELECT pg_terminate_backend(pg_stat_activity.pid) \
                 FROM pg_stat_activity WHERE datname = $1 AND pid <> pg_backend_pid()",
            )
            .bind(name)
            .execute(&mut conn)
            .await?;
            sqlx::query(&format!("DROP DATABASE {}", quote_ident(name)))
                .execute(&mut conn)
                .await?;
            println!("Database '{}' deleted", name);
        }

        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(name)))
            .execute(&mut conn)
            .await?;
        println!(
            "{}",
            style(format!("Database '{}' created successfully", name)).green()
        );
        self.db_name = Some(name.to_string());
        conn.close().await?;
        Ok(())
    }

    async fn create_tables(&mut self, employers_table: &str, openings_table: &str) -> Result<()> {
        let Some(db_name) = self.db_name.clone() else {
            println!(
                "{}",
                style("No database selected. Create the database first.").yellow()
            );
            return Ok(());
        };
        if is_placeholder(employers_table) || is_placeholder(openings_table) {
            println!("{}", style("Table names should not be empty").yellow());
            return Ok(());
        }

        self.employers_table = employers_table.to_string();
        self.openings_table = openings_table.to_string();

        let mut conn = connection::connect(&self.config, &db_name).await?;
        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                site_url TEXT,
                area_name VARCHAR(255),
                industries_name VARCHAR(255),
                open_vacancies INT
            )"#,
            quote_ident(employers_table)
        ))
        .execute(&mut conn)
        .await?;

        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                area_name VARCHAR(255) NOT NULL,
                salary INT,
                employer_id INT,
                employer_name VARCHAR(255) NOT NULL,
                requirement TEXT,
                responsibility TEXT,
                FOREIGN KEY (employer_id) REFERENCES {}(id)
            )"#,
            quote_ident(openings_table),
            quote_ident(employers_table)
        ))
        .execute(&mut conn)
        .await?;

        println!(
            "{}",
            style(format!(
                "Tables '{}' and '{}' created successfully",
                employers_table, openings_table
            ))
            .green()
        );
        conn.close().await?;
        Ok(())
    }

    async fn insert_values(&self, employers: &[Employer], openings: &[Opening]) -> Result<()> {
        let Some(db_name) = self.db_name.as_deref() else {
            println!(
                "{}",
                style("No database selected. Create the database first.").yellow()
            );
            return Ok(());
        };

        let employers_sql = format!(
            "INSERT INTO {} (id, name, site_url, area_name, industries_name, open_vacancies) \
             VALUES ($1, $2, $3, $4, $5, $6)",
            quote_ident(&self.employers_table)
        );
        let openings_sql = format!(
            "INSERT INTO {} (id, name, area_name, salary, employer_id, employer_name, \
             requirement, responsibility) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            quote_ident(&self.openings_table)
        );

        let mut conn = connection::connect(&self.config, db_name).await?;
        let mut tx = conn.begin().await?;
        for employer in employers {
            sqlx::query(&employers_sql)
                .bind(employer.id)
                .bind(employer.name.as_deref())
                .bind(employer.site_url.as_deref())
                .bind(employer.area_name.as_deref())
                .bind(employer.industries_name.as_deref())
                .bind(employer.open_vacancies)
                .execute(&mut *tx)
                .await?;
        }
        for opening in openings {
            sqlx::query(&openings_sql)
                .bind(opening.id)
                .bind(opening.name.as_deref())
                .bind(opening.area_name.as_deref())
                .bind(opening.salary)
                .bind(opening.employer_id)
                .bind(opening.employer_name.as_deref())
                .bind(opening.requirement.as_deref())
                .bind(opening.responsibility.as_deref())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        println!("{}", style("Data inserted successfully").green());
        conn.close().await?;
        Ok(())
    }
}
