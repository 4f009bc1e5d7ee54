use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::{AppResult, FileError};
use crate::models::settings::GenerationSettings;

/// 加载采样参数
///
/// 未提供覆盖文件时使用默认值；文件中缺省的字段同样保持默认值。
pub async fn load_generation_settings(path: Option<&Path>) -> AppResult<GenerationSettings> {
    let settings = match path {
        None => GenerationSettings::default(),
        Some(path) => {
            let content =
                fs::read_to_string(path)
                    .await
                    .map_err(|e| FileError::ReadFailed {
                        path: path.display().to_string(),
                        source: e,
                    })?;
            let settings: GenerationSettings =
                toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source: e,
                })?;
            info!("✓ 已加载采样参数文件: {}", path.display());
            settings
        }
    };

    settings.validate()?;
    Ok(settings)
}
