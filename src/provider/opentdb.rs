// src/provider/opentdb.rs

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{ProviderError, ProviderToken, QuestionProvider, RawQuestion};
use crate::models::{category::CategoryId, question::Question};

/// Open Trivia DB `response_code` values.
const CODE_SUCCESS: i64 = 0;
const CODE_NO_RESULTS: i64 = 1;
const CODE_TOKEN_NOT_FOUND: i64 = 3;
const CODE_TOKEN_EMPTY: i64 = 4;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    response_code: i64,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    response_code: i64,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl ApiQuestion {
    /// Requests are made with `encode=url3986`, so every string arrives percent-encoded.
    fn decode(self) -> RawQuestion {
        RawQuestion {
            question: percent_decode(&self.question),
            correct_answer: percent_decode(&self.correct_answer),
            incorrect_answers: self.incorrect_answers.iter().map(|a| percent_decode(a)).collect(),
        }
    }
}

fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// HTTP client for <https://opentdb.com>.
#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OpenTdbClient {
    /// Every request made by this client is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        // `Url::join` replaces the last path segment unless it ends with '/'.
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .map_err(|e| ProviderError::Unavailable(format!("invalid base url: {}", e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!("unexpected status {}", status)));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbClient {
    async fn acquire_token(&self) -> Result<ProviderToken, ProviderError> {
        let mut url = self.endpoint("api_token.php")?;
        url.query_pairs_mut().append_pair("command", "request");

        let body: TokenResponse = self.get_json(url).await?;

        match (body.response_code, body.token) {
            (CODE_SUCCESS, Some(token)) if !token.is_empty() => Ok(ProviderToken(token)),
            (code, _) => Err(ProviderError::Unavailable(format!(
                "token request failed with response_code {}",
                code
            ))),
        }
    }

    async fn fetch_questions(
        &self,
        token: &ProviderToken,
        category: CategoryId,
        count: u32,
    ) -> Result<Vec<Question>, ProviderError> {
        let mut url = self.endpoint("api.php")?;
        url.query_pairs_mut()
            .append_pair("amount", &count.to_string())
            .append_pair("category", &category.to_string())
            .append_pair("type", "multiple")
            .append_pair("encode", "url3986")
            .append_pair("token", token.as_str());

        let body: QuestionsResponse = self.get_json(url).await?;

        match body.response_code {
            CODE_SUCCESS => {}
            CODE_NO_RESULTS => return Err(ProviderError::EmptyResult),
            CODE_TOKEN_NOT_FOUND | CODE_TOKEN_EMPTY => return Err(ProviderError::TokenRejected),
            code => {
                return Err(ProviderError::Unavailable(format!(
                    "question request failed with response_code {}",
                    code
                )));
            }
        }

        if body.results.is_empty() {
            return Err(ProviderError::EmptyResult);
        }

        tracing::debug!(category, fetched = body.results.len(), "Fetched question batch");

        Ok(shuffle_batch(body.results))
    }
}

fn shuffle_batch(results: Vec<ApiQuestion>) -> Vec<Question> {
    let mut rng = rand::thread_rng();
    results
        .into_iter()
        .map(|q| q.decode().into_question(&mut rng))
        .collect()
}
