//! HTTP client for the motivation text-completion service

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::MotivationConfig;
use crate::error::{Error, Result};
use crate::types::InsightFacts;

/// Request body for POST /v1/motivation
#[derive(Debug, Serialize)]
struct MotivationRequest<'a> {
    /// Model to use for generation
    model: &'a str,
    /// The structured facts the prompt is built from
    facts: &'a InsightFacts,
}

/// Response from POST /v1/motivation
#[derive(Debug, Deserialize)]
pub struct MotivationResponse {
    /// The generated motivational message
    pub text: String,
    /// Model that produced the text, when reported
    #[serde(default)]
    pub model: Option<String>,
}

/// HTTP client for the motivation service
pub struct MotivationClient {
    config: MotivationConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl MotivationClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: MotivationConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .server_url
            .clone()
            .ok_or_else(|| Error::Config("motivation.server_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    /// Generate a short motivational message from an insight fact bundle.
    pub async fn generate(&self, facts: &InsightFacts) -> Result<MotivationResponse> {
        let url = format!("{}/v1/motivation", self.base_url);

        let request_body = MotivationRequest {
            model: &self.config.model,
            facts,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Motivation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            let result: MotivationResponse = response
                .json()
                .await
                .map_err(|e| Error::Motivation(format!("failed to parse response: {}", e)))?;
            Ok(result)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Motivation(format!(
                "API error ({}): {}",
                status, error_text
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HabitCategory;

    fn test_facts() -> InsightFacts {
        InsightFacts {
            habit_name: "Morning run".to_string(),
            category: HabitCategory::Health,
            current_streak: 7,
            longest_streak: 12,
            week_grid: vec![true, true, false, true, true, true, true],
            partner_week_count: Some(4),
            best_day: "Monday".to_string(),
            worst_day: "Wednesday".to_string(),
            milestone: Some("7-day".to_string()),
        }
    }

    #[test]
    fn test_new_requires_server_url() {
        let config = MotivationConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(MotivationClient::new(config).is_err());

        let config = MotivationConfig {
            enabled: true,
            server_url: Some("https://text.example.com/".to_string()),
            api_key: Some("mk_test".to_string()),
            ..Default::default()
        };
        let client = MotivationClient::new(config).unwrap();
        // Trailing slash trimmed so URL joins stay clean
        assert_eq!(client.base_url, "https://text.example.com");
    }

    #[test]
    fn test_request_body_carries_facts() {
        let facts = test_facts();
        let request = MotivationRequest {
            model: "text-small",
            facts: &facts,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "text-small");
        assert_eq!(json["facts"]["currentStreak"], 7);
        assert_eq!(json["facts"]["milestone"], "7-day");
        assert_eq!(json["facts"]["partnerWeekCount"], 4);
    }

    #[test]
    fn test_response_parsing() {
        let response: MotivationResponse =
            serde_json::from_str(r#"{"text": "One week strong. Keep the chain alive!"}"#).unwrap();
        assert!(response.text.contains("week"));
        assert!(response.model.is_none());
    }
}
