use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppResult, StorageError};
use crate::infrastructure::ObjectStore;

/// 存储在内存中的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// 内存对象存储
///
/// 用于本地演练与测试，写入语义与 GCS 的 `ifGenerationMatch=0` 一致。
#[derive(Debug)]
pub struct InMemoryObjectStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// 预置对象（绕过创建前置条件）
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Vec<u8>>, content_type: &str) {
        self.lock().insert(
            key.into(),
            StoredObject {
                data: data.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    /// 当前全部 key（有序）
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // 持锁期间不会 panic，中毒时直接沿用内部数据
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: Option<&str>) -> AppResult<Vec<String>> {
        let prefix = prefix.unwrap_or("");
        Ok(self
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.lock().contains_key(key))
    }

    async fn write(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()> {
        let mut objects = self.lock();
        if objects.contains_key(key) {
            return Err(StorageError::AlreadyExists {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            }
            .into());
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_never_overwrites() {
        let store = InMemoryObjectStore::new("answers");
        store
            .write("result_A.md", b"first".to_vec(), "text/markdown")
            .await
            .unwrap();
        let err = store
            .write("result_A.md", b"second".to_vec(), "text/markdown")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("result_A.md"));
        assert_eq!(store.get("result_A.md").unwrap().data, b"first".to_vec());
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let store = InMemoryObjectStore::new("screens");
        store.insert("a/1.png", Vec::new(), "image/png");
        store.insert("b/2.png", Vec::new(), "image/png");

        assert_eq!(store.list(Some("a/")).await.unwrap(), vec!["a/1.png"]);
        assert_eq!(store.list(None).await.unwrap().len(), 2);
        assert_eq!(store.uri("a/1.png"), "gs://screens/a/1.png");
    }
}
