//! HTTP client wrapper - runs catalogue queries and decodes responses

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::{LIMIT_PARAM, PAGE_PARAM, TOTAL_COUNT_HEADER};
use crate::error::ApiError;
use crate::messages::network::{Payload, Query};
use crate::models::{Page, User};

/// `{ status, data }` wrapper used by the auth endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: Option<u16>,
    data: Option<T>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client bound to one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()?;
        Self::with_client(http, &config.api_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with query parameters
    pub fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<(HeaderMap, T), ApiError> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok((headers, value))
    }

    /// `GET /{path}?{params}` returning a JSON array
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let url = self.url(path, params)?;
        let (_, items) = self.get_json(url).await?;
        Ok(items)
    }

    /// One page of a filtered collection, with the total from the
    /// count header (or the page length when the header is missing)
    pub async fn page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        page: u32,
        limit: u32,
    ) -> Result<Page<T>, ApiError> {
        let mut all_params = params.to_vec();
        all_params.push((PAGE_PARAM, page.to_string()));
        all_params.push((LIMIT_PARAM, limit.to_string()));

        let url = self.url(path, &all_params)?;
        let (headers, items): (_, Vec<T>) = self.get_json(url).await?;
        let total = total_count(&headers).unwrap_or_else(|| {
            tracing::debug!(path, "No total count header; using page length");
            items.len()
        });
        Ok(Page { items, total })
    }

    /// `GET /{path}/{id}`
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        let (_, value) = self.get_json(url).await?;
        Ok(value)
    }

    /// The logged-in user, or `None` when the server has no session
    pub async fn current_user(&self, path: &str) -> Result<Option<User>, ApiError> {
        let url = self.url(path, &[])?;
        let resp = self.http.get(url).send().await?;
        if resp.status() != StatusCode::OK {
            return Ok(None);
        }
        let envelope: Envelope<User> = resp.json().await?;
        Ok(envelope.data)
    }

    /// `None` when the server rejects the credentials
    pub async fn login(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let url = self.url(path, &[])?;
        let resp = self
            .http
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if resp.status().is_server_error() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
                url: resp.url().to_string(),
            });
        }
        // an unreadable body is a failure, a malformed one a rejection
        let body = resp.text().await?;
        let envelope: Envelope<User> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, "Login response is not an auth envelope");
                return Ok(None);
            }
        };
        match envelope {
            Envelope {
                status: Some(200),
                data: Some(user),
            } => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    pub async fn logout(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.http.post(url).send().await?;
        Ok(())
    }
}

/// Parses the total-count header
pub fn total_count(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(TOTAL_COUNT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Run `query` and decode its payload
pub async fn execute_query(client: &ApiClient, query: &Query) -> Result<Payload, ApiError> {
    let path = query.path();
    let params = query.params();

    let payload = match query {
        Query::Categories => Payload::Categories(client.list(&path, &params).await?),
        Query::Courses | Query::Featured(_) => Payload::Courses(client.list(&path, &params).await?),
        Query::Users => Payload::Users(client.list(&path, &params).await?),
        Query::Lessons => Payload::Lessons(client.list(&path, &params).await?),
        Query::Sections { .. } => Payload::Sections(client.list(&path, &params).await?),
        Query::Favorites { .. } => Payload::Favorites(client.list(&path, &params).await?),
        Query::Reviews { .. } => Payload::Reviews(client.list(&path, &params).await?),
        Query::Course(_) => Payload::Course(Box::new(client.get_one(&path).await?)),
        Query::CoursePage { page, limit, .. } => {
            Payload::CoursePage(client.page(&path, &params, *page, *limit).await?)
        }
        Query::CurrentUser => Payload::Session(client.current_user(&path).await?),
        Query::Login { email, password } => {
            Payload::Session(client.login(&path, email, password).await?)
        }
        Query::Logout => {
            client.logout(&path).await?;
            Payload::LoggedOut
        }
    };
    Ok(payload)
}
