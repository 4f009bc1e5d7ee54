/// 日志工具模块
///
/// 提供日志初始化与统计输出的辅助函数
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::RunSummary;

/// 初始化 tracing 日志，默认级别 `info`，可通过 `RUST_LOG` 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 测试中可能被多次调用
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 截图讲解批处理");
    info!("📥 输入: gs://{}", config.input_bucket);
    info!("📤 输出: gs://{}", config.output_bucket);
    info!("🤖 模型: {} ({})", config.model_name, config.region);
    info!("{}", "=".repeat(60));
}

/// 记录列表结果
pub fn log_listing(bucket: &str, total: usize) {
    info!("✓ gs://{} 中共找到 {} 个对象", bucket, total);
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if summary.listing_failed {
        error!("❌ 列举输入 bucket 失败，本次未处理任何对象");
    }
    info!("📄 对象总数: {}", summary.total);
    info!("✅ 成功: {}", summary.done);
    info!("⏭️ 已存在跳过: {}", summary.existing);
    info!("🚫 非图片跳过: {}", summary.non_image);
    info!("❌ 失败: {}", summary.failed_keys.len());
    for key in &summary.failed_keys {
        info!("   - {}", key);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
