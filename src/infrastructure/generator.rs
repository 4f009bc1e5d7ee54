use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::GenerationRequest;

/// 多模态生成能力
///
/// 模型、系统指令与采样参数在构建实现时确定，每次调用只传入图片与文本。
#[async_trait]
pub trait Generator: Send + Sync {
    /// 模型名称（仅用于日志）
    fn model(&self) -> &str;

    /// 同步等待完整结果，返回生成的文本
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
