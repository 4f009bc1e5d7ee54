//! 单次生成请求（不持久化）

/// 对输入对象的引用，由生成服务直接读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// 例如 `gs://bucket/folder/Q2.jpg`
    pub uri: String,
    /// 例如 `image/jpeg`
    pub mime_type: String,
}

/// 一次多模态生成请求：一张图片 + 固定的用户文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image: ImageReference,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(image: ImageReference, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
        }
    }
}
