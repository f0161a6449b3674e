//! HTTP client for the campus assistant backend. One method per endpoint,
//! typed request/response bodies, cookie-based admin session handled by
//! the server.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct AskReply {
    response: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthReply {
    authenticated: bool,
}

/// Outcome envelope the backend wraps admin mutations in. `status` is
/// "success" or "error"; `message` carries the reason on error.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStats {
    pub total_questions: u64,
    pub total_categories: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analytics {
    pub total_questions: u64,
    pub success_rate: f64,
    pub avg_response_time: f64,
}

#[derive(Serialize)]
struct AddQuestionRequest<'a> {
    category: &'a str,
    patterns: &'a [String],
    answer: &'a str,
}

#[derive(Clone)]
pub struct CampusClient {
    client: Client,
    base_url: String,
}

impl CampusClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Admin auth rides on the backend's session cookie. The timeout
        // bounds how long the thinking indicator can stay up on a dead
        // backend.
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Asks the assistant a question and returns its answer text.
    pub async fn ask(&self, message: &str) -> Result<String> {
        let url = format!("{}/get_response", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { message })
            .send()
            .await?;

        // The body carries the answer even on error statuses; a non-JSON
        // body is the actual failure case.
        let reply: AskReply = response.json().await?;
        Ok(reply.response)
    }

    /// Whether the backend still holds an admin session for us.
    pub async fn check_auth(&self) -> Result<bool> {
        let url = format!("{}/admin/check_auth", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Auth check failed with status: {}", response.status()));
        }

        let reply: AuthReply = response.json().await?;
        Ok(reply.authenticated)
    }

    /// Opens an admin session. Bad credentials come back as a parseable
    /// error-status body, not a transport failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<StatusReply> {
        let url = format!("{}/admin/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let reply: StatusReply = response.json().await?;
        Ok(reply)
    }

    pub async fn logout(&self) -> Result<StatusReply> {
        let url = format!("{}/admin/logout", self.base_url);

        let response = self.client.post(&url).send().await?;

        let reply: StatusReply = response.json().await?;
        Ok(reply)
    }

    /// Knowledge-base counters shown on the dashboard.
    pub async fn stats(&self) -> Result<AdminStats> {
        let url = format!("{}/admin/stats", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Loading stats failed with status: {}", response.status()));
        }

        let stats: AdminStats = response.json().await?;
        Ok(stats)
    }

    /// Submits a new Q&A pattern. Validation failures surface in the
    /// reply's `message`.
    pub async fn add_question(
        &self,
        category: &str,
        patterns: &[String],
        answer: &str,
    ) -> Result<StatusReply> {
        let url = format!("{}/admin/add_question", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AddQuestionRequest {
                category,
                patterns,
                answer,
            })
            .send()
            .await?;

        let reply: StatusReply = response.json().await?;
        Ok(reply)
    }

    pub async fn analytics(&self) -> Result<Analytics> {
        let url = format!("{}/api/analytics", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Loading analytics failed with status: {}", response.status()));
        }

        let analytics: Analytics = response.json().await?;
        Ok(analytics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_request_wire_shape() {
        let body = serde_json::to_value(AskRequest { message: "hostel fees" }).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hostel fees" }));
    }

    #[test]
    fn test_add_question_wire_shape() {
        let patterns = vec!["fees".to_string(), "fee structure".to_string()];
        let body = serde_json::to_value(AddQuestionRequest {
            category: "fees",
            patterns: &patterns,
            answer: "See www.adtu.in",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "category": "fees",
                "patterns": ["fees", "fee structure"],
                "answer": "See www.adtu.in",
            })
        );
    }

    #[test]
    fn test_status_reply_parses_error_body() {
        let reply: StatusReply =
            serde_json::from_str(r#"{"status":"error","message":"All fields are required"}"#)
                .unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.message, "All fields are required");

        let ok: StatusReply = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.is_success());
        assert!(ok.message.is_empty());
    }

    #[test]
    fn test_analytics_accepts_integer_rate() {
        let analytics: Analytics = serde_json::from_str(
            r#"{"total_questions":42,"success_rate":95,"avg_response_time":0.8}"#,
        )
        .unwrap();
        assert_eq!(analytics.total_questions, 42);
        assert_eq!(analytics.success_rate, 95.0);

        let stats: AdminStats =
            serde_json::from_str(r#"{"total_questions":7,"total_categories":3}"#).unwrap();
        assert_eq!(stats.total_categories, 3);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CampusClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
