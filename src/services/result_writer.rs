//! 结果写入服务 - 业务能力层
//!
//! 只负责"检查 / 写入 Markdown 结果"能力

use std::sync::Arc;

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::ObjectStore;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=UTF-8";

/// 结果写入服务
///
/// 输出对象是否存在是唯一的幂等标记，写入永不覆盖。
pub struct ResultWriter {
    store: Arc<dyn ObjectStore>,
}

impl ResultWriter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    pub fn uri(&self, output_key: &str) -> String {
        self.store.uri(output_key)
    }

    /// 该结果是否已经生成过
    pub async fn exists(&self, output_key: &str) -> AppResult<bool> {
        self.store.exists(output_key).await
    }

    /// 写入 Markdown 文本（UTF-8）
    pub async fn write(&self, output_key: &str, markdown: &str) -> AppResult<()> {
        debug!(
            "写入结果: {} ({} 字节)",
            self.store.uri(output_key),
            markdown.len()
        );
        self.store
            .write(
                output_key,
                markdown.as_bytes().to_vec(),
                MARKDOWN_CONTENT_TYPE,
            )
            .await
    }
}
