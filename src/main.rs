use anyhow::Result;
use exam_tutor_batch::utils::logging;
use exam_tutor_batch::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置（缺少必填项时立即失败）
    let config = Config::from_env()?;

    // 初始化并运行应用
    let _summary = App::initialize(config).await?.run().await;

    Ok(())
}
