//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 负责构建客户端、列举输入对象并逐个交给流程层处理，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<key>)
//!     ↓
//! workflow::ItemFlow (处理单个对象)
//!     ↓
//! services (能力层：tutor / writer)
//!     ↓
//! infrastructure (基础设施：ObjectStore / Generator)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格串行**：一个对象处理完再处理下一个
//! 2. **失败隔离**：单个对象失败只记录日志，不中断批处理
//! 3. **无业务逻辑**：只做调度和统计

pub mod batch_processor;

pub use batch_processor::{App, RunSummary};
