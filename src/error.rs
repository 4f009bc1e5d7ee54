use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 对象存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 生成服务错误
    #[error("生成服务错误: {0}")]
    Generation(#[from] GenerationError),
    /// 凭证错误
    #[error("凭证错误: {0}")]
    Auth(#[from] AuthError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 采样参数超出范围
    #[error("采样参数 {field} 无效: {reason}")]
    InvalidSetting { field: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {}", .paths.join(", "))]
    NotFound { paths: Vec<String> },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 文件内容为空
    #[error("文件内容为空: {path}")]
    Empty { path: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 对象存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 网络请求失败
    #[error("存储请求失败 ({bucket}/{key}): {source}")]
    RequestFailed {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },
    /// 返回非成功状态码
    #[error("存储返回错误响应 ({bucket}/{key}): status={status}, body={body}")]
    BadStatus {
        bucket: String,
        key: String,
        status: u16,
        body: String,
    },
    /// 响应 JSON 解析失败
    #[error("存储响应解析失败 ({bucket}): {source}")]
    DecodeFailed {
        bucket: String,
        #[source]
        source: BoxError,
    },
    /// 端点地址无效
    #[error("无效的存储端点: {url}")]
    InvalidBaseUrl { url: String },
    /// 目标对象已存在（写入前置条件失败）
    #[error("对象已存在，拒绝覆盖: {bucket}/{key}")]
    AlreadyExists { bucket: String, key: String },
}

/// 生成服务错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// API 调用失败
    #[error("生成 API 调用失败 (模型: {model}): {source}")]
    RequestFailed {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 返回非成功状态码
    #[error("生成 API 返回错误响应 (模型: {model}): status={status}, body={body}")]
    BadStatus {
        model: String,
        status: u16,
        body: String,
    },
    /// 返回内容为空
    #[error("生成结果为空 (模型: {model}, 原因: {reason})")]
    EmptyResponse { model: String, reason: String },
    /// 响应 JSON 解析失败
    #[error("生成响应解析失败 (模型: {model}): {source}")]
    DecodeFailed {
        model: String,
        #[source]
        source: BoxError,
    },
}

/// 凭证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 从元数据服务器获取令牌失败
    #[error("获取访问令牌失败: {0}")]
    TokenFetchFailed(#[source] BoxError),
    /// 元数据服务器返回错误
    #[error("元数据服务器返回错误响应: status={status}")]
    BadStatus { status: u16 },
}

// ========== 便捷构造函数 ==========

impl StorageError {
    pub(crate) fn request_failed(
        bucket: &str,
        key: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::RequestFailed {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: Box::new(source),
        }
    }
}

impl GenerationError {
    pub(crate) fn request_failed(
        model: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::RequestFailed {
            model: model.to_string(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
