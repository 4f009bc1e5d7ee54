/// Cloud Storage JSON API 客户端
///
/// 一个客户端对应一个 bucket，实现 `ObjectStore` 能力。
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::clients::TokenProvider;
use crate::error::{AppResult, StorageError};
use crate::infrastructure::ObjectStore;

/// 列表接口单页结果
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListObjectsPage {
    #[serde(default)]
    items: Vec<ObjectItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    name: String,
}

pub struct GcsClient {
    http: reqwest::Client,
    auth: Arc<TokenProvider>,
    base_url: String,
    bucket: String,
}

impl GcsClient {
    pub fn new(
        http: reqwest::Client,
        auth: Arc<TokenProvider>,
        base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth,
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    /// 拼接 API 地址，每个 segment 单独转义（对象 key 中的 `/` 会被编码）
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let invalid = || StorageError::InvalidBaseUrl {
            url: self.base_url.clone(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        self.endpoint(&["storage", "v1", "b", &self.bucket, "o", key])
    }

    fn list_url(&self) -> Result<Url, StorageError> {
        self.endpoint(&["storage", "v1", "b", &self.bucket, "o"])
    }

    fn upload_url(&self) -> Result<Url, StorageError> {
        self.endpoint(&["upload", "storage", "v1", "b", &self.bucket, "o"])
    }

    async fn bad_status(&self, key: &str, response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StorageError::BadStatus {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            status,
            body,
        }
    }

    async fn list_page(
        &self,
        prefix: Option<&str>,
        page_token: Option<&str>,
    ) -> AppResult<ListObjectsPage> {
        let token = self.auth.token().await?;
        let mut query: Vec<(&str, &str)> = vec![("fields", "items(name),nextPageToken")];
        if let Some(prefix) = prefix {
            query.push(("prefix", prefix));
        }
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        let response = self
            .http
            .get(self.list_url()?)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| StorageError::request_failed(&self.bucket, "", e))?;

        if !response.status().is_success() {
            return Err(self.bad_status("", response).await.into());
        }

        let page = response
            .json::<ListObjectsPage>()
            .await
            .map_err(|e| StorageError::DecodeFailed {
                bucket: self.bucket.clone(),
                source: Box::new(e),
            })?;
        Ok(page)
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: Option<&str>) -> AppResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(prefix, page_token.as_deref()).await?;
            debug!("gs://{} 列表页返回 {} 个对象", self.bucket, page.items.len());
            keys.extend(page.items.into_iter().map(|item| item.name));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let token = self.auth.token().await?;
        let response = self
            .http
            .get(self.object_url(key)?)
            .bearer_auth(token)
            .query(&[("fields", "name")])
            .send()
            .await
            .map_err(|e| StorageError::request_failed(&self.bucket, key, e))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(self.bad_status(key, response).await.into()),
        }
    }

    async fn write(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()> {
        let token = self.auth.token().await?;
        let response = self
            .http
            .post(self.upload_url()?)
            .bearer_auth(token)
            .query(&[
                ("uploadType", "media"),
                ("name", key),
                // 仅在对象不存在时创建
                ("ifGenerationMatch", "0"),
            ])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::request_failed(&self.bucket, key, e))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::PRECONDITION_FAILED => Err(StorageError::AlreadyExists {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            }
            .into()),
            _ => Err(self.bad_status(key, response).await.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GcsClient {
        let http = reqwest::Client::new();
        let auth = Arc::new(TokenProvider::with_static_token(http.clone(), "t"));
        GcsClient::new(http, auth, base_url, "exam-shots")
    }

    #[test]
    fn test_object_url_escapes_key() {
        let url = client("https://storage.googleapis.com")
            .object_url("folder/Q 2.jpg")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/exam-shots/o/folder%2FQ%202.jpg"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("http://localhost:4443/emulator/").upload_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4443/emulator/upload/storage/v1/b/exam-shots/o"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            client("not a url").list_url(),
            Err(StorageError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_list_page_parsing() {
        let page: ListObjectsPage = serde_json::from_str(
            r#"{"items":[{"name":"A.png"},{"name":"folder/B.jpg"}],"nextPageToken":"abc"}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].name, "folder/B.jpg");
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        // 空 bucket 不返回 items 字段
        let page: ListObjectsPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
