use anyhow::{bail, Context};
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Cookie carrying the session token. Matches the server's default
/// security.session_cookie setting.
pub const SESSION_COOKIE: &str = "token";

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                if let (Some(response_map), Some(data_map)) =
                    (response.as_object_mut(), data_value.as_object())
                {
                    response_map.extend(data_map.clone());
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Thin HTTP client over the API envelope. Every response is expected to
/// be `{"success": true, "data"/"message": ...}` or the uniform error body;
/// anything else is reported as-is.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));

        if let Some(token) = &self.token {
            builder = builder.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, token),
            );
        }

        builder
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .context("Network error")?;
        Self::into_envelope(response).await.map(|(body, _)| body)
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        let response = self
            .request(reqwest::Method::DELETE, path)
            .send()
            .await
            .context("Network error")?;
        Self::into_envelope(response).await.map(|(body, _)| body)
    }

    /// POST a JSON body. Also returns the session token if the server set
    /// one, so login/register can persist it.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> anyhow::Result<(Value, Option<String>)> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .context("Network error")?;
        Self::into_envelope(response).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> anyhow::Result<Value> {
        let response = self
            .request(reqwest::Method::POST, path)
            .multipart(form)
            .send()
            .await
            .context("Network error")?;
        Self::into_envelope(response).await.map(|(body, _)| body)
    }

    /// Unwrap the response envelope, bailing with the server's message on
    /// `success: false`.
    async fn into_envelope(
        response: reqwest::Response,
    ) -> anyhow::Result<(Value, Option<String>)> {
        let session = extract_session_cookie(response.headers());
        let status = response.status();

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Unexpected non-JSON response ({})", status))?;

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Internal server error");
            bail!("{}", message);
        }

        Ok((body, session))
    }
}

/// Pull the session token out of a Set-Cookie response header, if present.
fn extract_session_cookie(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);

    headers
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| {
            raw.strip_prefix(prefix.as_str())
                .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};

    #[test]
    fn extracts_session_token_from_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("token=abc.def.ghi; HttpOnly; SameSite=Lax; Path=/"),
        );

        assert_eq!(
            extract_session_cookie(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn ignores_unrelated_and_cleared_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("token=; Max-Age=0"));

        assert_eq!(extract_session_cookie(&headers), None);
    }
}
