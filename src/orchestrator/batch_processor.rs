//! 批量截图处理器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载指令与采样参数，构建存储与生成客户端（每次运行只构建一次）
//! 2. **列举对象**：列出输入 bucket 的全部对象，失败则直接结束本次运行
//! 3. **逐个处理**：按列表顺序串行交给 `ItemFlow`
//! 4. **全局统计**：汇总跳过 / 成功 / 失败数量

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::clients::{build_http_client, GcsClient, TokenProvider, VertexClient};
use crate::config::Config;
use crate::infrastructure::{Generator, ObjectStore};
use crate::models::{load_generation_settings, load_instruction};
use crate::services::{ResultWriter, TutorService};
use crate::utils::logging::{log_listing, log_startup, print_final_stats};
use crate::workflow::{ItemCtx, ItemFlow, ItemOutcome};

/// 运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 列表返回的对象数量
    pub total: usize,
    pub non_image: usize,
    pub existing: usize,
    pub done: usize,
    /// 处理失败的输入 key
    pub failed_keys: Vec<String>,
    /// 列举输入 bucket 失败，整次运行未处理任何对象
    pub listing_failed: bool,
}

impl RunSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::SkippedNonImage => self.non_image += 1,
            ItemOutcome::SkippedExisting => self.existing += 1,
            ItemOutcome::Done => self.done += 1,
        }
    }
}

/// 应用主结构
pub struct App {
    input: Arc<dyn ObjectStore>,
    input_prefix: Option<String>,
    flow: ItemFlow,
}

impl App {
    /// 用已构建好的存储与生成能力组装应用
    pub fn new(
        input: Arc<dyn ObjectStore>,
        output: Arc<dyn ObjectStore>,
        generator: Arc<dyn Generator>,
        user_prompt: impl Into<String>,
        input_prefix: Option<String>,
    ) -> Self {
        let flow = ItemFlow::new(
            input.clone(),
            TutorService::new(generator, user_prompt),
            ResultWriter::new(output),
        );
        Self {
            input,
            input_prefix,
            flow,
        }
    }

    /// 初始化应用：读取指令文件和采样参数，构建真实客户端
    ///
    /// 任何一步失败都会在发出列表或生成请求之前终止程序。
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let instruction = load_instruction(
            Path::new(&config.instruction_file),
            Path::new(&config.instruction_example_file),
        )
        .await?;

        let settings = load_generation_settings(
            config.generation_config_file.as_deref().map(Path::new),
        )
        .await?;
        info!(
            "⚙️ 采样参数: temperature={}, top_p={}, max_output_tokens={}, safety={}",
            settings.temperature,
            settings.top_p,
            settings.max_output_tokens,
            settings.safety_threshold
        );

        let http = build_http_client(&config).context("无法创建 HTTP 客户端")?;
        let auth = Arc::new(TokenProvider::from_optional_token(
            http.clone(),
            config.access_token.clone(),
        ));

        let input: Arc<dyn ObjectStore> = Arc::new(GcsClient::new(
            http.clone(),
            auth.clone(),
            config.storage_api_base_url.as_str(),
            config.input_bucket.as_str(),
        ));
        let output: Arc<dyn ObjectStore> = Arc::new(GcsClient::new(
            http.clone(),
            auth.clone(),
            config.storage_api_base_url.as_str(),
            config.output_bucket.as_str(),
        ));
        let generator: Arc<dyn Generator> =
            Arc::new(VertexClient::new(http, auth, &config, instruction, settings));

        Ok(Self::new(
            input,
            output,
            generator,
            config.user_prompt,
            config.input_prefix,
        ))
    }

    /// 运行批处理
    ///
    /// 单个对象的失败不会向外传播；只有列举失败会提前结束。
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        info!("--- 开始批量处理 gs://{} ---", self.input.bucket());
        let keys = match self.input.list(self.input_prefix.as_deref()).await {
            Ok(keys) => keys,
            Err(e) => {
                error!("❌ 无法列举 bucket gs://{}: {}", self.input.bucket(), e);
                summary.listing_failed = true;
                print_final_stats(&summary);
                return summary;
            }
        };

        summary.total = keys.len();
        log_listing(self.input.bucket(), keys.len());
        if keys.is_empty() {
            warn!("⚠️ 输入 bucket 中没有对象，程序结束");
        }

        for (idx, key) in keys.into_iter().enumerate() {
            let ctx = ItemCtx::new(idx + 1, summary.total, key);
            match self.flow.run(&ctx).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    error!("{} ❌ 处理失败: {}", ctx, e);
                    summary.failed_keys.push(ctx.input_key);
                }
            }
        }

        print_final_stats(&summary);
        summary
    }
}
