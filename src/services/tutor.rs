//! AI tutor client
//!
//! Talks to a locally running LLM engine (Ollama-compatible HTTP API). The
//! question is sent from a background task and the answer comes back over a
//! channel, so the UI never waits on the engine.

use log::{error, info, warn};
use serde_json::json;
use tokio::sync::mpsc;

use crate::errors::{Result, RoboBenchError};

const SYSTEM_PROMPT: &str = "You are an AI Tutor named Robo-Tutor for a beginner's robotics \
    application. Your audience is new to both C++ programming and robotics. Explain concepts \
    clearly and simply, using helpful analogies related to the ESP32 robot car they are working \
    on. Keep your answers concise.";

/// A question for the tutor, with optional code context
#[derive(Debug, Clone)]
pub struct TutorRequest {
    pub question: String,
    /// The snippet the user highlighted, if any
    pub snippet: Option<String>,
    /// The full sketch the user is working on
    pub code_context: Option<String>,
}

#[derive(Clone)]
pub struct TutorClient {
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl TutorClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Check whether the local engine is reachable
    pub async fn probe(&self) -> bool {
        match self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!("local AI engine detected at {}", self.base_url);
                true
            }
            _ => {
                warn!(
                    "local AI engine not found at {}; the tutor will be disabled",
                    self.base_url
                );
                false
            }
        }
    }

    /// Ask the tutor in the background; the answer (or an error text) is
    /// delivered on `tx`.
    pub fn ask(&self, request: TutorRequest, tx: mpsc::UnboundedSender<String>) {
        let client = self.clone();
        tokio::spawn(async move {
            let answer = match client.chat(&request).await {
                Ok(answer) => answer,
                Err(e) => {
                    error!("tutor request failed: {}", e);
                    "An error occurred while talking to the local AI engine.".to_string()
                }
            };
            let _ = tx.send(answer);
        });
    }

    fn user_prompt(request: &TutorRequest) -> String {
        match (&request.snippet, &request.code_context) {
            (Some(snippet), Some(context)) => format!(
                "The user is working on the following C++ code for their robot:\n---\n{}\n---\n\
                 They have highlighted this specific snippet:\n---\n{}\n---\n\
                 Their question about this snippet is: {}",
                context, snippet, request.question
            ),
            (None, Some(context)) => format!(
                "The user is working on the following C++ code for their robot:\n---\n{}\n---\n\
                 Their question is: {}",
                context, request.question
            ),
            _ => format!(
                "The user is working on a C++ program for an ESP32 robot car.\n\
                 They have asked the following general question: \"{}\"\n\
                 Please answer their question. Where possible, relate your answer back to the \
                 context of their robot car project.",
                request.question
            ),
        }
    }

    async fn chat(&self, request: &TutorRequest) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "stream": false,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::user_prompt(request)},
            ],
        });
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| RoboBenchError::Tutor(e.to_string()))?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RoboBenchError::Tutor(e.to_string()))?;
        body.pointer("/message/content")
            .and_then(|content| content.as_str())
            .map(|content| content.to_string())
            .ok_or_else(|| RoboBenchError::Tutor("malformed response from local engine".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_questions_get_a_standalone_prompt() {
        let request = TutorRequest {
            question: "What is a loop?".to_string(),
            snippet: None,
            code_context: None,
        };
        let prompt = TutorClient::user_prompt(&request);
        assert!(prompt.contains("What is a loop?"));
        assert!(prompt.contains("general question"));
    }

    #[test]
    fn snippet_questions_carry_both_code_blocks() {
        let request = TutorRequest {
            question: "Why the delay?".to_string(),
            snippet: Some("delay(1000);".to_string()),
            code_context: Some("void loop() { delay(1000); }".to_string()),
        };
        let prompt = TutorClient::user_prompt(&request);
        assert!(prompt.contains("delay(1000);"));
        assert!(prompt.contains("highlighted"));
    }
}
