use clap::Parser;
use std::path::PathBuf;

use hh_harvest::config::DbConfig;
use hh_harvest::pipeline;
use hh_harvest::services::hh_service::HhService;
use hh_harvest::services::loader_service::LoaderService;
use hh_harvest::services::report_service::ReportService;
use hh_harvest::utils::prompt;

/// Harvests employers and vacancies from the HeadHunter API, loads them into
/// PostgreSQL and prints a handful of reports.
#[derive(Parser)]
#[command(name = "hh-harvest", version, about)]
struct Cli {
    /// Path to the employer seed file (JSON array of {id, name})
    #[arg(long, default_value = "data/employers_list.json")]
    seed: PathBuf,

    /// Database to create and load into
    #[arg(long, default_value = "hh_data")]
    db_name: String,

    /// Search text applied while fetching vacancies; empty fetches everything
    #[arg(long, default_value = "")]
    text: String,

    /// Keyword for the final report; prompts interactively when omitted
    #[arg(long)]
    search: Option<String>,

    /// Drop an existing database without asking
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = DbConfig::from_env()?;

    let seeds = pipeline::load_seeds(&cli.seed)?;
    let api = HhService::new()?;
    let (employers, openings) = pipeline::harvest(&api, &seeds, &cli.text).await?;

    let mut store = LoaderService::new(config.clone(), cli.yes);
    pipeline::load(&mut store, &cli.db_name, &employers, &openings).await?;

    let reports = ReportService::new(config, cli.db_name);
    pipeline::report(&reports, || match cli.search {
        Some(keyword) => Ok(keyword),
        None => prompt::input_keyword("Keyword to search vacancies for"),
    })
    .await?;

    Ok(())
}
