use serde::Deserialize;

use crate::error::ConfigError;

/// 放宽过滤的四个有害内容类别
pub const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

/// 模型采样与安全过滤参数
///
/// 整次运行只构建一次，所有图片共享。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// 应用到所有类别的阈值
    pub safety_threshold: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            max_output_tokens: 2048,
            safety_threshold: "BLOCK_NONE".to_string(),
        }
    }
}

impl GenerationSettings {
    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "必须在 [0, 2] 之间"));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(invalid("top_p", "必须在 (0, 1] 之间"));
        }
        if self.max_output_tokens == 0 {
            return Err(invalid("max_output_tokens", "必须大于 0"));
        }
        if self.safety_threshold.trim().is_empty() {
            return Err(invalid("safety_threshold", "不能为空"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GenerationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_output_tokens, 2048);
        assert_eq!(settings.safety_threshold, "BLOCK_NONE");
    }

    #[test]
    fn test_out_of_range_values() {
        let settings = GenerationSettings {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GenerationSettings {
            top_p: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GenerationSettings {
            max_output_tokens: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
