/// 访问令牌提供者
///
/// 优先使用环境变量中的静态令牌；否则向 Cloud Run / GCE 元数据服务器
/// 请求默认服务账号的令牌，并在过期前复用。
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AuthError;

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// 令牌到期前提前刷新的秒数
const REFRESH_MARGIN_SECS: i64 = 60;

enum TokenSource {
    Static(String),
    MetadataServer { url: String },
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct TokenProvider {
    http: reqwest::Client,
    source: TokenSource,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// 使用固定令牌
    pub fn with_static_token(http: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            http,
            source: TokenSource::Static(token.into()),
            cached: Mutex::new(None),
        }
    }

    /// 使用元数据服务器
    pub fn with_metadata_server(http: reqwest::Client) -> Self {
        Self {
            http,
            source: TokenSource::MetadataServer {
                url: METADATA_TOKEN_URL.to_string(),
            },
            cached: Mutex::new(None),
        }
    }

    /// 根据配置选择令牌来源
    pub fn from_optional_token(http: reqwest::Client, token: Option<String>) -> Self {
        match token {
            Some(token) => Self::with_static_token(http, token),
            None => Self::with_metadata_server(http),
        }
    }

    /// 获取可用的 Bearer 令牌
    pub async fn token(&self) -> Result<String, AuthError> {
        let url = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::MetadataServer { url } => url,
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        debug!("正在从元数据服务器获取访问令牌");
        let response = self
            .http
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AuthError::TokenFetchFailed(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenFetchFailed(Box::new(e)))?;

        let token = body.access_token.clone();
        *cached = Some(CachedToken {
            token: body.access_token,
            expires_at: expiry_from(Utc::now(), body.expires_in),
        });
        Ok(token)
    }
}

fn expiry_from(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    now + Duration::seconds((expires_in - REFRESH_MARGIN_SECS).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_returned_as_is() {
        let provider = TokenProvider::from_optional_token(
            reqwest::Client::new(),
            Some("ya29.test".to_string()),
        );
        assert_eq!(provider.token().await.unwrap(), "ya29.test");
    }

    #[test]
    fn test_expiry_keeps_refresh_margin() {
        let now = Utc::now();
        assert_eq!(expiry_from(now, 3599), now + Duration::seconds(3539));
        assert_eq!(expiry_from(now, 10), now);
    }

    #[test]
    fn test_metadata_response_parsing() {
        let body: MetadataTokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.abc","expires_in":3599,"token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(body.access_token, "ya29.abc");
        assert_eq!(body.expires_in, 3599);
    }
}
