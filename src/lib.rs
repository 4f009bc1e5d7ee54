//! # Exam Tutor Batch
//!
//! 批量读取云存储中的考试截图，调用多模态模型生成 Markdown 讲解并写回输出 bucket。
//! 已存在结果的截图会被跳过，可以在部分失败后安全地重新运行。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力的 trait：`ObjectStore`、`Generator`
//! - `clients/` - 基于 reqwest 的具体实现：`GcsClient`、`VertexClient`、`TokenProvider`
//!
//! ### ② 业务能力层（Services）
//! - `TutorService` - 为一张截图生成讲解
//! - `ResultWriter` - 检查 / 写入 Markdown 结果
//!
//! ### ③ 流程层（Workflow）
//! - `ItemCtx` - 上下文封装（序号 + 输入 key + 输出 key）
//! - `ItemFlow` - 流程编排（过滤 → 存在性检查 → 生成 → 写入）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 构建客户端、列举对象、串行调度、统计

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Generator, InMemoryObjectStore, ObjectStore};
pub use models::{GenerationRequest, GenerationSettings, ImageReference};
pub use orchestrator::{App, RunSummary};
pub use workflow::{ItemCtx, ItemFlow, ItemOutcome};
