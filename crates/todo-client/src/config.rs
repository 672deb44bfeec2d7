use crate::errors::ClientError;
use reqwest::Url;
use std::env;

/// OIDC で要求するスコープ
pub const OIDC_SCOPE: &str = "phone openid email";

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API Gateway ステージの URL（`/todos` はこの下）
    pub api_invoke_url: String,
    pub cognito_authority: Option<String>,
    pub cognito_client_id: Option<String>,
    pub cognito_redirect_uri: Option<String>,
    /// Hosted UI のドメイン（サインイン・サインアウト URL の組み立てに使う）
    pub cognito_domain: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_invoke_url = value("API_INVOKE_URL")
            .ok_or_else(|| ClientError::Config("API_INVOKE_URL is required".to_string()))?;

        Ok(Self {
            api_invoke_url,
            cognito_authority: value("COGNITO_AUTHORITY"),
            cognito_client_id: value("COGNITO_CLIENT_ID"),
            cognito_redirect_uri: value("COGNITO_REDIRECT_URI"),
            cognito_domain: value("COGNITO_DOMAIN"),
        })
    }

    /// 認可コードフローのサインイン URL
    pub fn sign_in_url(&self) -> Result<Url, ClientError> {
        let domain = required(&self.cognito_domain, "COGNITO_DOMAIN")?;
        let client_id = required(&self.cognito_client_id, "COGNITO_CLIENT_ID")?;
        let redirect_uri = required(&self.cognito_redirect_uri, "COGNITO_REDIRECT_URI")?;

        Url::parse_with_params(
            &format!("{}/oauth2/authorize", domain.trim_end_matches('/')),
            &[
                ("client_id", client_id),
                ("response_type", "code"),
                ("scope", OIDC_SCOPE),
                ("redirect_uri", redirect_uri),
            ],
        )
        .map_err(|e| ClientError::Config(format!("invalid COGNITO_DOMAIN: {e}")))
    }

    /// Hosted UI のログアウト URL（戻り先はリダイレクト URI）
    pub fn sign_out_url(&self) -> Result<Url, ClientError> {
        let domain = required(&self.cognito_domain, "COGNITO_DOMAIN")?;
        let client_id = required(&self.cognito_client_id, "COGNITO_CLIENT_ID")?;
        let logout_uri = required(&self.cognito_redirect_uri, "COGNITO_REDIRECT_URI")?;

        Url::parse_with_params(
            &format!("{}/logout", domain.trim_end_matches('/')),
            &[("client_id", client_id), ("logout_uri", logout_uri)],
        )
        .map_err(|e| ClientError::Config(format!("invalid COGNITO_DOMAIN: {e}")))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ClientError> {
    value
        .as_deref()
        .ok_or_else(|| ClientError::Config(format!("{name} is required")))
}
