//! Round trips against a real PostgreSQL server. Run with
//! `cargo test -- --ignored` after pointing DB_* at a disposable server;
//! the tests create and drop their own databases.

use rust_decimal::Decimal;

use hh_harvest::config::DbConfig;
use hh_harvest::models::employer::Employer;
use hh_harvest::models::opening::Opening;
use hh_harvest::services::loader_service::{ConfirmFn, LoaderService, VacancyStore};
use hh_harvest::services::report_service::{ReportService, VacancyReports};

fn test_config() -> DbConfig {
    dotenvy::dotenv().ok();
    DbConfig::from_env().expect("DB_* environment variables")
}

fn employer(id: i64, name: &str) -> Employer {
    Employer {
        id: Some(id),
        name: Some(name.to_string()),
        site_url: Some(format!("https://{}.example", name.to_lowercase())),
        area_name: Some("Москва".to_string()),
        industries_name: Some("IT".to_string()),
        open_vacancies: Some(3),
    }
}

fn opening(id: i64, employer_id: i64, name: &str, salary: Option<i64>, requirement: &str) -> Opening {
    Opening {
        id: Some(id),
        name: Some(name.to_string()),
        area_name: Some("Москва".to_string()),
        salary,
        employer_id: Some(employer_id),
        employer_name: Some("Employer".to_string()),
        requirement: Some(requirement.to_string()),
        responsibility: Some("Работать".to_string()),
    }
}

#[tokio::test]
#[ignore = "needs a running PostgreSQL with DB_* set"]
async fn load_and_report_round_trip() {
    let config = test_config();
    // assume_yes drops leftovers from previous runs without prompting
    let mut loader = LoaderService::new(config.clone(), true);
    loader
        .create_database("hh_harvest_test")
        .await
        .expect("create database");
    loader
        .create_tables("employers", "openings")
        .await
        .expect("create tables");

    let employers = vec![employer(1, "Alpha"), employer(2, "Beta")];
    let openings = vec![
        opening(10, 1, "Java Developer", Some(1000), "Знание Java и SQL"),
        opening(11, 1, "Rust Developer", Some(2000), "Знание Rust"),
        opening(12, 2, "Intern", None, "Без опыта"),
    ];
    loader
        .insert_values(&employers, &openings)
        .await
        .expect("insert");

    let reports = ReportService::new(config, "hh_harvest_test");

    let all_employers = reports.get_all_employers().await.expect("employers");
    assert_eq!(all_employers.len(), 2);
    assert!(all_employers.iter().any(|e| e.name == "Alpha"));
    assert!(all_employers.iter().any(|e| e.name == "Beta"));

    let all_vacancies = reports.get_all_vacancies().await.expect("vacancies");
    assert_eq!(all_vacancies.len(), 3);

    // NULL salaries stay out of the average: (1000 + 2000) / 2
    let avg = reports.get_avg_salary().await.expect("avg").expect("non-null avg");
    assert_eq!(avg, Decimal::from(1500));

    let higher = reports
        .get_vacancies_with_higher_salary()
        .await
        .expect("higher");
    assert_eq!(higher.len(), 1);
    assert_eq!(higher[0].id, 11);

    let java = reports
        .get_vacancies_with_keyword("java")
        .await
        .expect("keyword");
    assert_eq!(java.len(), 1, "ILIKE matches case-insensitively");
    assert_eq!(java[0].id, 10);

    let requirement_hit = reports
        .get_vacancies_with_keyword("опыта")
        .await
        .expect("keyword");
    assert_eq!(requirement_hit.len(), 1);
    assert_eq!(requirement_hit[0].id, 12);

    let nothing = reports
        .get_vacancies_with_keyword("cobol")
        .await
        .expect("keyword");
    assert!(nothing.is_empty());
}

#[tokio::test]
#[ignore = "needs a running PostgreSQL with DB_* set"]
async fn declined_recreation_leaves_the_database_untouched() {
    let config = test_config();
    let mut loader = LoaderService::new(config.clone(), true);
    loader
        .create_database("hh_harvest_test_keep")
        .await
        .expect("create database");
    loader
        .create_tables("employers", "openings")
        .await
        .expect("create tables");
    loader
        .insert_values(&[employer(1, "Alpha")], &[])
        .await
        .expect("insert");

    // A second run over the same name, declining the recreate question.
    let decline: ConfirmFn = Box::new(|_| Ok(false));
    let mut second = LoaderService::with_confirm(config.clone(), false, decline);
    second
        .create_database("hh_harvest_test_keep")
        .await
        .expect("declining is not an error");
    // No database was selected, so the follow-up steps stay guarded no-ops
    // instead of touching the surviving tables.
    second
        .create_tables("employers", "openings")
        .await
        .expect("guarded no-op");
    second
        .insert_values(&[employer(2, "Beta")], &[])
        .await
        .expect("guarded no-op");

    let reports = ReportService::new(config, "hh_harvest_test_keep");
    let rows = reports.get_all_employers().await.expect("rows");
    assert_eq!(rows.len(), 1, "existing data survives the declined prompt");
    assert_eq!(rows[0].name, "Alpha");
}

#[tokio::test]
#[ignore = "needs a running PostgreSQL with DB_* set"]
async fn dangling_employer_reference_rolls_back_the_batch() {
    let config = test_config();
    let mut loader = LoaderService::new(config.clone(), true);
    loader
        .create_database("hh_harvest_test_fk")
        .await
        .expect("create database");
    loader
        .create_tables("employers", "openings")
        .await
        .expect("create tables");

    let employers = vec![employer(1, "Alpha")];
    let openings = vec![
        opening(10, 1, "Ok", Some(100), "x"),
        opening(11, 999, "Dangling", Some(100), "x"),
    ];
    let inserted = loader.insert_values(&employers, &openings).await;
    assert!(inserted.is_err(), "unknown employer_id must fail the insert");

    // the transaction covers both tables, so the employers are gone too
    let reports = ReportService::new(config, "hh_harvest_test_fk");
    assert!(reports.get_all_employers().await.expect("rows").is_empty());
    assert!(reports.get_all_vacancies().await.expect("rows").is_empty());
}

#[tokio::test]
#[ignore = "needs a running PostgreSQL with DB_* set"]
async fn duplicate_ids_roll_back_the_batch() {
    let config = test_config();
    let mut loader = LoaderService::new(config.clone(), true);
    loader
        .create_database("hh_harvest_test_dup")
        .await
        .expect("create database");
    loader
        .create_tables("employers", "openings")
        .await
        .expect("create tables");

    let employers = vec![employer(1, "Alpha"), employer(1, "AlphaAgain")];
    let inserted = loader.insert_values(&employers, &[]).await;
    assert!(inserted.is_err(), "duplicate primary key must fail the insert");

    let reports = ReportService::new(config, "hh_harvest_test_dup");
    assert!(reports.get_all_employers().await.expect("rows").is_empty());
}
