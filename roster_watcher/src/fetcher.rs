//! HTTP access to the participants page.
//!
//! The poll loop talks to the network only through the [`PageFetcher`]
//! trait, so tests can feed it captured pages. The production
//! implementation performs one authenticated blocking GET per iteration
//! against the roster-listing endpoint and insists on a 200 response.
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use roster_common::{Result, WatchError};
use std::time::Duration;

/// Session cookie name expected by the e-learning host.
const SESSION_COOKIE: &str = "MoodleSessionedisciplinas";
/// Page size requested so the whole roster arrives in a single response.
const PAGE_SIZE: u32 = 5000;

/// Source of the raw participants page, one fetch per poll iteration.
pub trait PageFetcher {
    /// Fetch the page and return its HTML body.
    fn fetch_page(&self) -> Result<String>;
}

/// Authenticated blocking HTTP fetcher for the roster-listing endpoint.
pub struct HttpRosterFetcher {
    client: Client,
    url: String,
    cookie: String,
}

impl HttpRosterFetcher {
    /// Build a fetcher for `course_id` on `base_url`, authenticating with
    /// the given session token and bounding each request by `timeout`.
    pub fn new(base_url: &str, course_id: u64, session: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let url = format!(
            "{}/user/index.php?page=0&perpage={}&contextid=0&id={}&newcourse",
            base_url.trim_end_matches('/'),
            PAGE_SIZE,
            course_id
        );
        Ok(Self {
            client,
            url,
            cookie: format!("{}={}", SESSION_COOKIE, session),
        })
    }
}

impl PageFetcher for HttpRosterFetcher {
    fn fetch_page(&self) -> Result<String> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(COOKIE, self.cookie.as_str())
            .send()
            .map_err(|e| WatchError::Fetch(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WatchError::Fetch(format!(
                "Status code {} != 200",
                status.as_u16()
            )));
        }
        response
            .text()
            .map_err(|e| WatchError::Fetch(format!("Failed to read response body: {}", e)))
    }
}
