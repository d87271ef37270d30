use super::{SupabaseClient, SupabaseError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Identity delegation to the hosted auth service (GoTrue). The alert mapper
/// does not depend on anything in this module.

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign-up responses come in two shapes: a full session when the project
/// auto-confirms, or a bare user object while confirmation is pending.
#[derive(Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<AuthUser>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Pulls the human-readable message out of a GoTrue error body, falling back
/// to the raw body when it is not the JSON shape we know.
fn api_error(status: StatusCode, body: String) -> SupabaseError {
    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or(body);
    SupabaseError::Api {
        status: status.as_u16(),
        message,
    }
}

impl SupabaseClient {
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let body: SignUpResponse = serde_json::from_str(&response.text().await?)?;
        match (body.access_token, body.user) {
            (Some(access_token), Some(user)) => Ok(AuthSession {
                access_token,
                refresh_token: body.refresh_token,
                user,
            }),
            // A user without a session means the project wants the address
            // confirmed before the first sign-in.
            _ => Err(SupabaseError::ConfirmationRequired),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let session: AuthSession = serde_json::from_str(&response.text().await?)?;
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }
        Ok(())
    }

    /// Looks up the user behind a session token. An unauthorized token is not
    /// an error, just "nobody signed in".
    pub async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let user: AuthUser = serde_json::from_str(&response.text().await?)?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_extracts_known_message_fields() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_description":"Invalid login credentials"}"#.to_string(),
        );
        match err {
            SupabaseError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"msg":"Password should be at least 6 characters"}"#.to_string(),
        );
        match err {
            SupabaseError::Api { message, .. } => {
                assert_eq!(message, "Password should be at least 6 characters");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream timeout".to_string());
        match err {
            SupabaseError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream timeout");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sign_up_response_both_shapes_parse() {
        let confirmed: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"tok","refresh_token":"ref","user":{"id":"u1","email":"a@b.c"}}"#,
        )
        .unwrap();
        assert_eq!(confirmed.access_token.as_deref(), Some("tok"));
        assert_eq!(confirmed.user.unwrap().id, "u1");

        let pending: SignUpResponse =
            serde_json::from_str(r#"{"id":"u2","email":"a@b.c"}"#).unwrap();
        assert!(pending.access_token.is_none());
        assert!(pending.user.is_none());
    }
}
