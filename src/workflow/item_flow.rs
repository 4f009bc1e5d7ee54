//! 单个对象处理流程 - 流程层
//!
//! 核心职责：定义"一张截图"的完整处理流程
//!
//! 流程顺序：
//! 1. 过滤非图片 → 跳过
//! 2. 输出已存在 → 跳过
//! 3. 生成讲解 → 写入 Markdown

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::ObjectStore;
use crate::models::{classify, ImageReference, InputKind};
use crate::services::{ResultWriter, TutorService};
use crate::utils::logging::truncate_text;
use crate::workflow::item_ctx::ItemCtx;

/// 单个对象的处理结果（失败以 `Err` 返回）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 不是图片（或是目录占位对象）
    SkippedNonImage,
    /// 输出已存在，之前的运行已处理过
    SkippedExisting,
    /// 已生成并写入
    Done,
}

/// 单个对象处理流程
///
/// - 不持有列表，也不决定失败后是否继续
/// - 只依赖业务能力（services）
pub struct ItemFlow {
    input: Arc<dyn ObjectStore>,
    tutor: TutorService,
    writer: ResultWriter,
}

impl ItemFlow {
    pub fn new(input: Arc<dyn ObjectStore>, tutor: TutorService, writer: ResultWriter) -> Self {
        Self {
            input,
            tutor,
            writer,
        }
    }

    pub async fn run(&self, ctx: &ItemCtx) -> AppResult<ItemOutcome> {
        let mime_type = match classify(&ctx.input_key) {
            InputKind::Image { mime_type } => mime_type,
            InputKind::Directory | InputKind::Unsupported => {
                info!("{} 跳过非图片文件", ctx);
                return Ok(ItemOutcome::SkippedNonImage);
            }
        };

        if self.writer.exists(&ctx.output_key).await? {
            info!(
                "{} ⏭️ 跳过: 输出文件 {} 已存在",
                ctx, ctx.output_key
            );
            return Ok(ItemOutcome::SkippedExisting);
        }

        let image = ImageReference {
            uri: self.input.uri(&ctx.input_key),
            mime_type,
        };
        info!("{} 🔍 正在处理 | URI: {}", ctx, image.uri);

        let markdown = self.tutor.explain(image).await?;
        debug!("{} 结果预览: {}", ctx, truncate_text(&markdown, 80));

        self.writer.write(&ctx.output_key, &markdown).await?;
        info!(
            "{} ✓ 结果已写入: {}",
            ctx,
            self.writer.uri(&ctx.output_key)
        );

        Ok(ItemOutcome::Done)
    }
}
