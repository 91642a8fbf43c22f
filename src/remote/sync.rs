//! Content-sync server client
//!
//! The sync server is an external collaborator; this module only defines the
//! client surface the app talks to and a thin HTTP implementation. The auth
//! token lives in an explicitly passed [`SessionStore`], never in a global.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{Result, RoboBenchError};
use crate::models::Curriculum;
use crate::store::session::SessionStore;

const TOKEN_KEY: &str = "session_token";
const TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    role: &'a str,
    developer_key: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CurriculumPayload<'a> {
    curriculum: &'a Curriculum,
}

#[derive(Debug, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassCreatedResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    class_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassDataResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    curriculum: Option<Curriculum>,
}

#[derive(Debug, Deserialize)]
struct StudentCountResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    student_count: u32,
}

/// Client surface for the content-sync server
#[async_trait]
pub trait SyncClient: Send {
    async fn signup(
        &self,
        email: &str,
        password: &str,
        role: &str,
        developer_key: Option<&str>,
    ) -> Result<Acknowledgement>;
    async fn login(&mut self, email: &str, password: &str) -> Result<()>;
    fn logout(&mut self);
    fn is_logged_in(&mut self) -> bool;
    async fn create_class(&mut self, curriculum: &Curriculum) -> Result<String>;
    async fn fetch_class(&mut self, class_code: &str) -> Result<Curriculum>;
    async fn update_class(&mut self, class_code: &str, curriculum: &Curriculum) -> Result<()>;
    async fn student_count(&mut self, class_code: &str) -> Result<u32>;
}

pub struct HttpSyncClient {
    base_url: String,
    http: reqwest::Client,
    sessions: Box<dyn SessionStore>,
}

impl HttpSyncClient {
    pub fn new(base_url: impl Into<String>, sessions: Box<dyn SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
            sessions,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn token(&mut self) -> Result<String> {
        self.sessions
            .get(TOKEN_KEY)
            .ok_or_else(|| RoboBenchError::Session("not logged in".to_string()))
    }
}

fn remote_err(e: reqwest::Error) -> RoboBenchError {
    RoboBenchError::Remote(e.to_string())
}

fn rejected(message: Option<String>) -> RoboBenchError {
    RoboBenchError::Remote(message.unwrap_or_else(|| "request rejected by server".to_string()))
}

#[async_trait]
impl SyncClient for HttpSyncClient {
    async fn signup(
        &self,
        email: &str,
        password: &str,
        role: &str,
        developer_key: Option<&str>,
    ) -> Result<Acknowledgement> {
        let payload = SignupRequest {
            email,
            password,
            role,
            developer_key,
        };
        let response = self
            .http
            .post(self.url("signup"))
            .json(&payload)
            .send()
            .await
            .map_err(remote_err)?;
        response.json().await.map_err(remote_err)
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let payload = LoginRequest { email, password };
        let response = self
            .http
            .post(self.url("login"))
            .json(&payload)
            .send()
            .await
            .map_err(remote_err)?;
        let body: LoginResponse = response.json().await.map_err(remote_err)?;
        match (body.success, body.token) {
            (true, Some(token)) => {
                self.sessions.put(TOKEN_KEY, token, TOKEN_TTL);
                Ok(())
            }
            (true, None) => Err(RoboBenchError::Remote(
                "login response carried no token".to_string(),
            )),
            (false, _) => Err(rejected(body.message)),
        }
    }

    fn logout(&mut self) {
        self.sessions.expire(TOKEN_KEY);
    }

    fn is_logged_in(&mut self) -> bool {
        self.sessions.get(TOKEN_KEY).is_some()
    }

    async fn create_class(&mut self, curriculum: &Curriculum) -> Result<String> {
        let token = self.token()?;
        let response = self
            .http
            .post(self.url("class/create"))
            .bearer_auth(token)
            .json(&CurriculumPayload { curriculum })
            .send()
            .await
            .map_err(remote_err)?;
        let body: ClassCreatedResponse = response.json().await.map_err(remote_err)?;
        if body.success {
            body.class_code
                .ok_or_else(|| RoboBenchError::Remote("response missing class code".to_string()))
        } else {
            Err(rejected(body.message))
        }
    }

    async fn fetch_class(&mut self, class_code: &str) -> Result<Curriculum> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url(&format!("class/{}", class_code)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(remote_err)?;
        let body: ClassDataResponse = response.json().await.map_err(remote_err)?;
        if body.success {
            body.curriculum
                .ok_or_else(|| RoboBenchError::Remote("response missing curriculum".to_string()))
        } else {
            Err(rejected(body.message))
        }
    }

    async fn update_class(&mut self, class_code: &str, curriculum: &Curriculum) -> Result<()> {
        let token = self.token()?;
        let response = self
            .http
            .post(self.url(&format!("class/{}/update", class_code)))
            .bearer_auth(token)
            .json(&CurriculumPayload { curriculum })
            .send()
            .await
            .map_err(remote_err)?;
        let body: Acknowledgement = response.json().await.map_err(remote_err)?;
        if body.success {
            Ok(())
        } else {
            Err(rejected(body.message))
        }
    }

    async fn student_count(&mut self, class_code: &str) -> Result<u32> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url(&format!("class/{}/student_count", class_code)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(remote_err)?;
        let body: StudentCountResponse = response.json().await.map_err(remote_err)?;
        if body.success {
            Ok(body.student_count)
        } else {
            Err(rejected(body.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::session::MemorySessionStore;

    #[test]
    fn requests_without_login_are_rejected_locally() {
        let mut client =
            HttpSyncClient::new("http://localhost:5000/", Box::new(MemorySessionStore::new()));
        assert!(!client.is_logged_in());
        assert!(matches!(
            client.token(),
            Err(RoboBenchError::Session(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            HttpSyncClient::new("http://localhost:5000/", Box::new(MemorySessionStore::new()));
        assert_eq!(client.url("login"), "http://localhost:5000/login");
    }
}
