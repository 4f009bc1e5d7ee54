use async_trait::async_trait;

use crate::error::AppResult;

/// 对象存储能力
///
/// 一个实例对应一个 bucket。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// bucket 名称（仅用于日志）
    fn bucket(&self) -> &str;

    /// 列举 bucket 中的全部对象 key，顺序由存储决定
    async fn list(&self, prefix: Option<&str>) -> AppResult<Vec<String>>;

    /// 对象是否存在
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// 创建对象；目标已存在时必须失败而不是覆盖
    async fn write(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// 生成服务可直接读取的对象 URI
    fn uri(&self, key: &str) -> String {
        format!("gs://{}/{}", self.bucket(), key)
    }
}
