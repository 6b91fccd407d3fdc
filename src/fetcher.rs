//! Paginated bulk fetcher for the hackathon listing API
//!
//! One [`FetchSession`] drives a full harvest run: a single discovery
//! request to page 1 learns the total record count and page size, then the
//! remaining pages are fetched concurrently under a semaphore-capped
//! ceiling, each with its own shared-budget retry loop.
//!
//! Although page requests run concurrently, results are folded into the
//! output strictly in ascending page order: the join handle for page N+1 is
//! awaited before page N+2's, so the final collection's order is independent
//! of network timing.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::retry::RetryState;
use crate::types::{ApiPage, Discovery, FetchReport};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Path of the listing endpoint, relative to the configured base URL
const API_PATH: &str = "/api/hackathons";

/// Process-scoped fetch session
///
/// Owns the HTTP client and the concurrency limiter for the duration of one
/// full fetch run; page-fetch tasks borrow both through cheap clones. The
/// limiter is the sole mutual-exclusion mechanism; result accumulation
/// happens on the calling task at deterministic await points, so no other
/// locking exists.
#[derive(Clone)]
pub struct FetchSession {
    config: FetchConfig,
    client: reqwest::Client,
    endpoint: Url,
    limiter: Arc<Semaphore>,
}

impl FetchSession {
    /// Create a session from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)?.join(API_PATH)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.page_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        let limiter = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            config,
            client,
            endpoint,
            limiter,
        })
    }

    /// The configuration this session was built from
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// Issue the discovery request (page 1) and compute the page count
    ///
    /// There is no retry at this step: if page 1 cannot be fetched or
    /// decoded, no downstream work is possible and the whole run is off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] on any request, status, decode, or
    /// metadata problem, including a reported page size of zero.
    pub async fn discover(&self) -> Result<Discovery> {
        let url = self.page_url(1);
        tracing::info!(%url, "fetching page 1 to determine total pages");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Discovery(format!("request for page 1 failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Discovery(format!("page 1 returned HTTP {status}")));
        }

        let page: ApiPage = response
            .json()
            .await
            .map_err(|e| Error::Discovery(format!("page 1 could not be decoded: {e}")))?;

        let meta = page
            .meta
            .ok_or_else(|| Error::Discovery("page 1 response has no meta section".to_string()))?;
        if meta.per_page == 0 {
            return Err(Error::Discovery("meta.per_page is zero".to_string()));
        }

        let total_pages =
            u32::try_from(meta.total_count.div_ceil(meta.per_page)).map_err(|_| {
                Error::Discovery(format!("implausible page count for {} records", meta.total_count))
            })?;

        tracing::info!(
            total_count = meta.total_count,
            per_page = meta.per_page,
            total_pages,
            "discovery complete"
        );

        Ok(Discovery {
            total_pages,
            total_count: meta.total_count,
            per_page: meta.per_page,
            first_page: page.hackathons,
        })
    }

    /// Fetch one page, retrying under the shared attempt budget
    ///
    /// Holds one limiter permit for the whole retry loop, so a page mid-retry
    /// still counts against the concurrency ceiling. Returns `None` once the
    /// budget is exhausted (the page is then a recorded failure, never an
    /// error) or if the limiter has been closed.
    pub async fn fetch_page(&self, page: u32) -> Option<ApiPage> {
        let _permit = self.limiter.acquire().await.ok()?;
        let mut retry = RetryState::new(&self.config);

        loop {
            match self.request_page(page).await {
                Ok(body) => return Some(body),
                Err(error) => match retry.next_delay(&error) {
                    Some(delay) => {
                        tracing::debug!(
                            page,
                            error = %error,
                            delay_ms = delay.as_millis() as u64,
                            "page fetch failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!(
                            page,
                            error = %error,
                            attempts = retry.attempts_made(),
                            "page fetch failed after all attempts"
                        );
                        return None;
                    }
                },
            }
        }
    }

    /// One attempt at one page: request, status dispatch, decode
    async fn request_page(&self, page: u32) -> Result<ApiPage> {
        let url = self.page_url(page);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::PageNotFound { page });
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch every page and return the flattened, ordered collection
    ///
    /// Page 1's records are flattened immediately (already in hand from
    /// discovery). Tasks for pages 2..=total_pages are all spawned up front
    /// (they queue on the limiter) and their results are folded in ascending
    /// page order at the await points of this single control-flow task.
    ///
    /// Partial-failure tolerant: an exhausted page contributes zero records
    /// and is appended to `failed_pages`; no page's failure aborts the run.
    pub async fn fetch_all(&self, discovery: Discovery) -> FetchReport {
        let mut report = FetchReport {
            pages_attempted: discovery.total_pages.max(1),
            ..Default::default()
        };

        for raw in &discovery.first_page {
            report.records.push(flatten(raw));
        }

        if discovery.total_pages < 2 {
            tracing::info!(records = report.records.len(), "single page, nothing more to fetch");
            return report;
        }

        tracing::info!(
            first = 2,
            last = discovery.total_pages,
            max_concurrent = self.config.max_concurrent,
            "fetching remaining pages"
        );

        let mut handles = Vec::with_capacity(discovery.total_pages as usize - 1);
        for page in 2..=discovery.total_pages {
            let session = self.clone();
            handles.push((page, tokio::spawn(async move { session.fetch_page(page).await })));
        }

        let total_tasks = handles.len() as u64;
        let interval = self.config.progress_interval.max(1);
        let mut completed = 0u64;

        for (page, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::error!(page, error = %error, "page fetch task panicked");
                    None
                }
            };
            completed += 1;

            if completed % interval == 0 || completed == total_tasks {
                tracing::info!(
                    completed,
                    total = total_tasks,
                    percent = completed * 100 / total_tasks,
                    "page fetch progress"
                );
            }

            match outcome {
                Some(body) => report.records.extend(body.hackathons.iter().map(flatten)),
                None => report.failed_pages.push(page),
            }
        }

        if !report.failed_pages.is_empty() {
            let first_twenty: Vec<u32> =
                report.failed_pages.iter().take(20).copied().collect();
            tracing::warn!(
                failed = report.failed_pages.len(),
                pages = ?first_twenty,
                "some pages failed to fetch"
            );
        }

        report
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> FetchConfig {
        FetchConfig {
            base_url,
            max_attempts: 3,
            page_timeout: Duration::from_secs(2),
            not_found_backoff: Duration::from_millis(5),
            transient_backoff: Duration::from_millis(5),
            ..Default::default()
        }
    }

    fn hackathons(ids: &[u64]) -> serde_json::Value {
        json!(
            ids.iter()
                .map(|id| json!({"id": id, "title": format!("Hack {id}")}))
                .collect::<Vec<_>>()
        )
    }

    fn page_mock(page: u32, body: serde_json::Value) -> Mock {
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
    }

    async fn session_for(server: &MockServer) -> FetchSession {
        FetchSession::new(test_config(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn discover_computes_ceil_page_count() {
        let server = MockServer::start().await;
        page_mock(
            1,
            json!({"meta": {"total_count": 100, "per_page": 25}, "hackathons": hackathons(&[1])}),
        )
        .mount(&server)
        .await;

        let discovery = session_for(&server).await.discover().await.unwrap();
        assert_eq!(discovery.total_pages, 4, "exact multiple: 100/25");
        assert_eq!(discovery.total_count, 100);
        assert_eq!(discovery.per_page, 25);
        assert_eq!(discovery.first_page.len(), 1);
    }

    #[tokio::test]
    async fn discover_rounds_partial_pages_up() {
        let server = MockServer::start().await;
        page_mock(
            1,
            json!({"meta": {"total_count": 101, "per_page": 25}, "hackathons": hackathons(&[1])}),
        )
        .mount(&server)
        .await;

        let discovery = session_for(&server).await.discover().await.unwrap();
        assert_eq!(discovery.total_pages, 5, "101/25 rounds up");
    }

    #[tokio::test]
    async fn discover_failure_is_fatal_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = session_for(&server).await.discover().await;
        assert!(matches!(result, Err(Error::Discovery(_))));
    }

    #[tokio::test]
    async fn discover_rejects_missing_meta() {
        let server = MockServer::start().await;
        page_mock(1, json!({"hackathons": hackathons(&[1])}))
            .mount(&server)
            .await;

        let result = session_for(&server).await.discover().await;
        assert!(matches!(result, Err(Error::Discovery(_))));
    }

    #[tokio::test]
    async fn discover_rejects_zero_page_size() {
        let server = MockServer::start().await;
        page_mock(
            1,
            json!({"meta": {"total_count": 10, "per_page": 0}, "hackathons": []}),
        )
        .mount(&server)
        .await;

        let result = session_for(&server).await.discover().await;
        assert!(matches!(result, Err(Error::Discovery(_))));
    }

    #[tokio::test]
    async fn fetch_page_decodes_success_body() {
        let server = MockServer::start().await;
        page_mock(2, json!({"hackathons": hackathons(&[10, 11])}))
            .mount(&server)
            .await;

        let page = session_for(&server).await.fetch_page(2).await.unwrap();
        assert_eq!(page.hackathons.len(), 2);
        assert_eq!(page.hackathons[0].id, Some(10));
    }

    #[tokio::test]
    async fn permanent_404_uses_exact_attempt_budget_then_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let outcome = session_for(&server).await.fetch_page(2).await;
        assert!(outcome.is_none(), "exhausted page yields no records");
        // Mock::expect(3) verifies the attempt count on server drop
    }

    #[tokio::test]
    async fn page_recovers_within_attempt_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        page_mock(2, json!({"hackathons": hackathons(&[20])}))
            .mount(&server)
            .await;

        let page = session_for(&server).await.fetch_page(2).await.unwrap();
        assert_eq!(page.hackathons.len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_counts_against_the_same_budget() {
        let server = MockServer::start().await;
        // Valid JSON object without the hackathons key: decode error, retryable
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .expect(3)
            .mount(&server)
            .await;

        let outcome = session_for(&server).await.fetch_page(2).await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn per_attempt_timeout_is_retried_then_recorded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"hackathons": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut config = test_config(server.uri());
        config.max_attempts = 2;
        config.page_timeout = Duration::from_millis(100);
        let session = FetchSession::new(config).unwrap();

        let outcome = session.fetch_page(2).await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn fetch_all_preserves_page_order_under_random_latency() {
        let server = MockServer::start().await;
        // Later pages answer faster than earlier ones
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"hackathons": hackathons(&[200, 201])}))
                    .set_delay(Duration::from_millis(250)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/hackathons"))
            .and(query_param("page", "3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"hackathons": hackathons(&[300])}))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        page_mock(4, json!({"hackathons": hackathons(&[400, 401])}))
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let discovery = Discovery {
            total_pages: 4,
            total_count: 7,
            per_page: 2,
            first_page: vec![crate::types::RawHackathon {
                id: Some(100),
                ..Default::default()
            }],
        };

        let report = session.fetch_all(discovery).await;
        let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![100, 200, 201, 300, 400, 401]);
        assert!(report.failed_pages.is_empty());
        assert_eq!(report.pages_attempted, 4);
    }

    #[tokio::test]
    async fn fetch_all_tolerates_individual_page_failures() {
        let server = MockServer::start().await;
        for page in [2u32, 4, 5, 6, 8] {
            page_mock(page, json!({"hackathons": hackathons(&[u64::from(page) * 100])}))
                .mount(&server)
                .await;
        }
        for page in [3u32, 7] {
            Mock::given(method("GET"))
                .and(path("/api/hackathons"))
                .and(query_param("page", page.to_string()))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;
        }

        let session = session_for(&server).await;
        let discovery = Discovery {
            total_pages: 8,
            total_count: 8,
            per_page: 1,
            first_page: vec![crate::types::RawHackathon {
                id: Some(100),
                ..Default::default()
            }],
        };

        let report = session.fetch_all(discovery).await;
        assert_eq!(report.failed_pages, vec![3, 7]);
        // Page 1 plus the five successful remote pages, one record each
        assert_eq!(report.records.len(), 6);
        let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![100, 200, 400, 500, 600, 800]);
    }

    #[tokio::test]
    async fn three_page_run_end_to_end() {
        // total_count=250, per_page=100 -> 3 pages; page 1 records come from
        // discovery, pages 2-3 are fetched concurrently
        let server = MockServer::start().await;
        page_mock(
            1,
            json!({
                "meta": {"total_count": 250, "per_page": 100},
                "hackathons": hackathons(&[1, 2, 3]),
            }),
        )
        .expect(1)
        .mount(&server)
        .await;
        page_mock(2, json!({"hackathons": hackathons(&[4, 5])}))
            .expect(1)
            .mount(&server)
            .await;
        page_mock(3, json!({"hackathons": hackathons(&[6])}))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_for(&server).await;
        let discovery = session.discover().await.unwrap();
        assert_eq!(discovery.total_pages, 3);

        let report = session.fetch_all(discovery).await;
        assert_eq!(report.records.len(), 6);
        assert!(report.failed_pages.is_empty());
        let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn single_page_run_never_touches_the_network() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and count as a failure

        let session = session_for(&server).await;
        let discovery = Discovery {
            total_pages: 1,
            total_count: 2,
            per_page: 100,
            first_page: vec![
                crate::types::RawHackathon {
                    id: Some(1),
                    ..Default::default()
                },
                crate::types::RawHackathon {
                    id: Some(2),
                    ..Default::default()
                },
            ],
        };

        let report = session.fetch_all(discovery).await;
        assert_eq!(report.records.len(), 2);
        assert!(report.failed_pages.is_empty());
        assert_eq!(report.pages_attempted, 1);
    }
}
