use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::employer::{Employer, SeedEmployer};
use crate::models::extract::numeric_id;
use crate::models::opening::Opening;

const HH_BASE_URL: &str = "https://api.hh.ru";
const HH_USER_AGENT: &str = "HH-User-Agent";
const PER_PAGE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP status observed for one employer lookup. The harvest keeps going on
/// failures, so callers that care must inspect these instead of assuming
/// every seed produced a record.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupStatus {
    pub employer_id: i64,
    pub status: u16,
}

/// Employers harvested in one pass, plus the raw statuses seen on the way.
#[derive(Debug, Default)]
pub struct EmployerFetch {
    pub employers: Vec<Employer>,
    pub statuses: Vec<LookupStatus>,
}

/// Read side of the job board API, behind a trait so the pipeline can run
/// against a stand-in.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn fetch_employers(&self, seeds: &[SeedEmployer]) -> Result<EmployerFetch>;

    /// Fetches vacancies matching `text` for each employer id, or one
    /// unfiltered pass when `employer_ids` is empty. Duplicate vacancy ids
    /// across pages and employers are kept once, first encounter winning.
    async fn fetch_openings(&self, text: &str, employer_ids: &[i64]) -> Result<Vec<Opening>>;
}

#[derive(Debug, Deserialize)]
struct VacanciesPage {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    1
}

pub struct HhService {
    client: Client,
    base_url: String,
}

impl HhService {
    pub fn new() -> Result<Self> {
        Self::with_base_url(HH_BASE_URL)
    }

    /// Points the connector at an alternative server. Tests use this to talk
    /// to a local stand-in.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(HH_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Walks the paginated vacancy listing for one employer filter, pages
    /// 0, 1, 2... until an empty page or the server-reported last index.
    /// A failed or malformed page aborts this walk only; records already
    /// collected stay collected.
    async fn collect_openings(
        &self,
        text: &str,
        employer_id: Option<i64>,
        seen_ids: &mut HashSet<i64>,
        openings: &mut Vec<Opening>,
    ) {
        let url = format!("{}/vacancies", self.base_url);
        let mut page: u32 = 0;
        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("text", text)])
                .query(&[("page", page), ("per_page", PER_PAGE)]);
            if let Some(id) = employer_id {
                request = request.query(&[("employer_id", id)]);
            }

            let listing = match Self::fetch_page(request).await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(
                        "Vacancy request failed (employer {:?}, page {}): {}",
                        employer_id, page, e
                    );
                    break;
                }
            };
            debug!(
                "Vacancy page {} (employer {:?}): {} items, {} pages total",
                page,
                employer_id,
                listing.items.len(),
                listing.pages
            );

            if listing.items.is_empty() {
                break;
            }
            for item in &listing.items {
                let Some(id) = numeric_id(item.get("id")) else {
                    continue;
                };
                if seen_ids.insert(id) {
                    openings.push(Opening::from_item(item));
                }
            }
            if page >= listing.pages.saturating_sub(1) {
                break;
            }
            page += 1;
        }
    }

    async fn fetch_page(request: reqwest::RequestBuilder) -> Result<VacanciesPage> {
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<VacanciesPage>().await?)
    }
}

#[async_trait]
impl JobBoardApi for HhService {
    async fn fetch_employers(&self, seeds: &[SeedEmployer]) -> Result<EmployerFetch> {
        let mut fetch = EmployerFetch::default();
        for seed in seeds {
            let url = format!("{}/employers/{}", self.base_url, seed.id);
            let response = match self
                .client
                .get(&url)
                .query(&[("locale", "RU"), ("host", "hh.ru")])
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Employer {} request failed: {}", seed.id, e);
                    continue;
                }
            };

            let status = response.status();
            fetch.statuses.push(LookupStatus {
                employer_id: seed.id,
                status: status.as_u16(),
            });
            if !status.is_success() {
                warn!("Employer {} lookup returned {}", seed.id, status);
                continue;
            }

            match response.json::<Value>().await {
                Ok(item) => fetch.employers.push(Employer::from_item(&item)),
                Err(e) => warn!("Employer {} returned malformed JSON: {}", seed.id, e),
            }
        }
        info!(
            "Fetched {} of {} employers",
            fetch.employers.len(),
            seeds.len()
        );
        Ok(fetch)
    }

    async fn fetch_openings(&self, text: &str, employer_ids: &[i64]) -> Result<Vec<Opening>> {
        let mut openings = Vec::new();
        let mut seen_ids = HashSet::new();

        if employer_ids.is_empty() {
            self.collect_openings(text, None, &mut seen_ids, &mut openings)
                .await;
        } else {
            for &employer_id in employer_ids {
                self.collect_openings(text, Some(employer_id), &mut seen_ids, &mut openings)
                    .await;
            }
        }

        info!("Collected {} unique openings", openings.len());
        Ok(openings)
    }
}
