use std::fs;
use std::path::Path;

use console::style;
use tracing::info;
use validator::Validate;

use crate::database::{EMPLOYERS_TABLE, OPENINGS_TABLE};
use crate::error::Result;
use crate::models::employer::{Employer, SeedEmployer};
use crate::models::opening::Opening;
use crate::services::hh_service::JobBoardApi;
use crate::services::loader_service::VacancyStore;
use crate::services::report_service::VacancyReports;

/// Reads and validates the employer seed file.
pub fn load_seeds(path: &Path) -> Result<Vec<SeedEmployer>> {
    let raw = fs::read_to_string(path)?;
    let seeds: Vec<SeedEmployer> = serde_json::from_str(&raw)?;
    for seed in &seeds {
        seed.validate()?;
    }
    info!(
        "Loaded {} employer seeds from {}",
        seeds.len(),
        path.display()
    );
    Ok(seeds)
}

/// Fetches every seeded employer, then every vacancy they list that matches
/// `text`. Lookup failures reduce the result instead of aborting it.
pub async fn harvest<A: JobBoardApi>(
    api: &A,
    seeds: &[SeedEmployer],
    text: &str,
) -> Result<(Vec<Employer>, Vec<Opening>)> {
    let fetch = api.fetch_employers(seeds).await?;
    let failed = fetch
        .statuses
        .iter()
        .filter(|s| s.status < 200 || s.status >= 300)
        .count();
    if failed > 0 {
        println!(
            "{}",
            style(format!(
                "{} of {} employer lookups failed, continuing without them",
                failed,
                fetch.statuses.len()
            ))
            .yellow()
        );
    }

    let employer_ids: Vec<i64> = fetch.employers.iter().filter_map(|e| e.id).collect();
    let openings = api.fetch_openings(text, &employer_ids).await?;
    Ok((fetch.employers, openings))
}

/// Drives the write side in order: database, tables, transactional insert.
pub async fn load<S: VacancyStore>(
    store: &mut S,
    db_name: &str,
    employers: &[Employer],
    openings: &[Opening],
) -> Result<()> {
    store.create_database(db_name).await?;
    store.create_tables(EMPLOYERS_TABLE, OPENINGS_TABLE).await?;
    store.insert_values(employers, openings).await?;
    Ok(())
}

/// Runs all five reports and prints them to stdout. The keyword for the
/// final report is resolved only once the first four have printed, so an
/// interactive source asks after the user has seen the data.
pub async fn report<R, F>(reports: &R, keyword: F) -> Result<()>
where
    R: VacancyReports,
    F: FnOnce() -> Result<String>,
{
    print_header("All employers");
    for row in reports.get_all_employers().await? {
        println!("{row}");
    }

    print_header("All vacancies");
    for row in reports.get_all_vacancies().await? {
        println!("{row}");
    }

    print_header("Average salary");
    match reports.get_avg_salary().await? {
        Some(avg) => println!("{}", avg.round_dp(2)),
        None => println!("no salary data"),
    }

    print_header("Vacancies with above-average salary");
    for row in reports.get_vacancies_with_higher_salary().await? {
        println!("{row}");
    }

    let keyword = keyword()?;
    print_header(&format!("Vacancies matching '{}'", keyword));
    for row in reports.get_vacancies_with_keyword(&keyword).await? {
        println!("{row}");
    }

    Ok(())
}

fn print_header(msg: &str) {
    println!();
    println!("{}", style(msg).bold());
}
