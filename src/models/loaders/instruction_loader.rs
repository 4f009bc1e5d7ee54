use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::error::FileError;

/// 读取系统指令文本
///
/// 优先读取 `primary`；不存在时退回 `example` 并给出警告；两者都不存在时报错。
pub async fn load_instruction(primary: &Path, example: &Path) -> Result<String, FileError> {
    let (path, content) = match read_if_exists(primary).await? {
        Some(content) => (primary, content),
        None => {
            warn!(
                "⚠️ 未找到指令文件 {}，改用示例文件 {}",
                primary.display(),
                example.display()
            );
            match read_if_exists(example).await? {
                Some(content) => (example, content),
                None => {
                    return Err(FileError::NotFound {
                        paths: vec![
                            primary.display().to_string(),
                            example.display().to_string(),
                        ],
                    })
                }
            }
        }
    };

    let instruction = content.trim().to_string();
    if instruction.is_empty() {
        return Err(FileError::Empty {
            path: path.display().to_string(),
        });
    }

    info!(
        "✓ 已加载指令文件: {} ({} 字符)",
        path.display(),
        instruction.chars().count()
    );
    Ok(instruction)
}

async fn read_if_exists(path: &Path) -> Result<Option<String>, FileError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FileError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        }),
    }
}
