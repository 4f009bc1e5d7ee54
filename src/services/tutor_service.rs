//! 讲解服务 - 业务能力层
//!
//! 只负责"为一张截图生成讲解"能力，不关心流程

use std::sync::Arc;

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::Generator;
use crate::models::{GenerationRequest, ImageReference};

/// 讲解服务
///
/// 职责：
/// - 把图片引用与固定的用户文本组装成一次请求
/// - 只处理单张图片
/// - 不关心 key 推导与是否跳过
pub struct TutorService {
    generator: Arc<dyn Generator>,
    user_prompt: String,
}

impl TutorService {
    pub fn new(generator: Arc<dyn Generator>, user_prompt: impl Into<String>) -> Self {
        Self {
            generator,
            user_prompt: user_prompt.into(),
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// 生成讲解文本
    pub async fn explain(&self, image: ImageReference) -> AppResult<String> {
        debug!("请求讲解: {} ({})", image.uri, image.mime_type);
        let request = GenerationRequest::new(image, self.user_prompt.as_str());
        self.generator.generate(&request).await
    }
}
