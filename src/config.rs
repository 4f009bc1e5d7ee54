use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";
pub const DEFAULT_INSTRUCTION_FILE: &str = "prompts/system_instruction.md";
pub const DEFAULT_INSTRUCTION_EXAMPLE_FILE: &str = "prompts/system_instruction.example.md";
pub const DEFAULT_STORAGE_API_BASE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_USER_PROMPT: &str =
    "Analiza esta pregunta de certificación y sigue las instrucciones de sistema.";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// 程序配置
///
/// 启动时从环境变量构建一次，之后以引用方式传入各层。
#[derive(Clone, Debug)]
pub struct Config {
    /// GCP 项目 ID
    pub project_id: String,
    /// Vertex AI 区域
    pub region: String,
    /// 输入 bucket（截图）
    pub input_bucket: String,
    /// 输出 bucket（Markdown 结果）
    pub output_bucket: String,
    /// 只处理该前缀下的对象
    pub input_prefix: Option<String>,
    pub model_name: String,
    // --- 指令文件 ---
    pub instruction_file: String,
    pub instruction_example_file: String,
    /// 与图片一起发送的用户文本
    pub user_prompt: String,
    /// 采样参数覆盖文件（TOML）
    pub generation_config_file: Option<String>,
    // --- API 端点 ---
    pub storage_api_base_url: String,
    pub vertex_api_base_url: String,
    /// 静态访问令牌；为空时走元数据服务器
    pub access_token: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数加载配置，缺少必填项时立即失败
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: name.to_string(),
            })
        };

        let project_id = require("GCP_PROJECT")?;
        let input_bucket = require("INPUT_BUCKET_NAME")?;
        let output_bucket = require("OUTPUT_BUCKET_NAME")?;
        let region = get("GCP_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::EnvVarParseFailed {
                    var_name: "HTTP_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    expected_type: "u64".to_string(),
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let vertex_api_base_url =
            get("VERTEX_API_BASE_URL").unwrap_or_else(|| vertex_base_url_for(&region));

        Ok(Self {
            project_id,
            input_bucket,
            output_bucket,
            input_prefix: get("INPUT_PREFIX"),
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            instruction_file: get("INSTRUCTION_FILE")
                .unwrap_or_else(|| DEFAULT_INSTRUCTION_FILE.to_string()),
            instruction_example_file: get("INSTRUCTION_EXAMPLE_FILE")
                .unwrap_or_else(|| DEFAULT_INSTRUCTION_EXAMPLE_FILE.to_string()),
            user_prompt: get("USER_PROMPT").unwrap_or_else(|| DEFAULT_USER_PROMPT.to_string()),
            generation_config_file: get("GENERATION_CONFIG_FILE"),
            storage_api_base_url: get("STORAGE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STORAGE_API_BASE_URL.to_string()),
            vertex_api_base_url,
            access_token: get("GOOGLE_OAUTH_ACCESS_TOKEN"),
            http_timeout: Duration::from_secs(http_timeout_secs),
            region,
        })
    }
}

/// `global` 区域没有区域前缀
fn vertex_base_url_for(region: &str) -> String {
    if region == "global" {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{}-aiplatform.googleapis.com", region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GCP_PROJECT", "demo-project"),
            ("INPUT_BUCKET_NAME", "screenshots"),
            ("OUTPUT_BUCKET_NAME", "answers"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&required()).unwrap();
        assert_eq!(config.project_id, "demo-project");
        assert_eq!(config.region, "us-central1");
        assert_eq!(config.model_name, "gemini-2.5-flash");
        assert_eq!(
            config.vertex_api_base_url,
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(config.http_timeout, Duration::from_secs(300));
        assert!(config.input_prefix.is_none());
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_each_required_var_is_fatal() {
        for missing in ["GCP_PROJECT", "INPUT_BUCKET_NAME", "OUTPUT_BUCKET_NAME"] {
            let mut vars = required();
            vars.remove(missing);
            match load(&vars) {
                Err(ConfigError::EnvVarNotFound { var_name }) => assert_eq!(var_name, missing),
                other => panic!("缺少 {} 时应失败, 实际: {:?}", missing, other),
            }
        }
    }

    #[test]
    fn test_blank_required_var_counts_as_missing() {
        let mut vars = required();
        vars.insert("OUTPUT_BUCKET_NAME", "   ");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::EnvVarNotFound { .. })
        ));
    }

    #[test]
    fn test_global_region_endpoint() {
        let mut vars = required();
        vars.insert("GCP_REGION", "global");
        let config = load(&vars).unwrap();
        assert_eq!(config.vertex_api_base_url, "https://aiplatform.googleapis.com");
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let mut vars = required();
        vars.insert("HTTP_TIMEOUT_SECS", "soon");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::EnvVarParseFailed { .. })
        ));
    }
}
