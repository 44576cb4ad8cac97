//! GoTrue password auth: sign up, sign in, sign out.
use serde::Deserialize;
use serde_json::{Value, json};

use super::{BackendError, Result, Session, User};

pub struct AuthClient {
    base_url: String,
    anon_key: String,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        log::info!("signing in as {email}");
        self.token_request(
            &self.endpoint("/auth/v1/token?grant_type=password"),
            email,
            password,
        )
    }

    /// Sign up and return a session. Instances that require email
    /// confirmation return no tokens; that surfaces as an Api error telling
    /// the user to confirm first.
    pub fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        log::info!("signing up {email}");
        self.token_request(&self.endpoint("/auth/v1/signup"), email, password)
    }

    pub fn sign_out(&self, session: &Session) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/logout"))
            .header("apikey", &self.anon_key)
            .header(
                "Authorization",
                format!("Bearer {}", session.access_token),
            )
            .send()?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            log::error!("sign out failed with status {status}");
        }
        Ok(())
    }

    fn token_request(&self, url: &str, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()?;

        let status = response.status();
        let body: Value = response.json()?;
        if !status.is_success() {
            let message = extract_message(&body);
            log::error!("auth request failed ({status}): {message}");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = serde_json::from_value(body)?;
        match (token.access_token, token.refresh_token, token.user) {
            (Some(access_token), Some(refresh_token), Some(user)) => Ok(Session {
                access_token,
                refresh_token,
                user: User {
                    id: user.id,
                    email: user.email.unwrap_or_default(),
                },
            }),
            _ => Err(BackendError::Api {
                status: status.as_u16(),
                message: "account created, confirm your email before signing in".to_string(),
            }),
        }
    }
}

/// Pull a human-readable message out of a GoTrue error body. The field name
/// varies by endpoint and version.
fn extract_message(body: &Value) -> String {
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(msg) = body.get(key).and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    "unknown error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = AuthClient::new("https://proj.supabase.co/", "key");
        assert_eq!(
            client.endpoint("/auth/v1/signup"),
            "https://proj.supabase.co/auth/v1/signup"
        );
    }

    #[test]
    fn test_extract_message_tries_known_keys() {
        assert_eq!(
            extract_message(&json!({"msg": "Invalid login credentials"})),
            "Invalid login credentials"
        );
        assert_eq!(
            extract_message(&json!({"error_description": "bad grant"})),
            "bad grant"
        );
        assert_eq!(extract_message(&json!({"code": 400})), "unknown error");
    }
}
