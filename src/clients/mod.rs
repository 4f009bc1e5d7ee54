pub mod auth;
pub mod gcs_client;
pub mod vertex_client;

pub use auth::TokenProvider;
pub use gcs_client::GcsClient;
pub use vertex_client::VertexClient;

use crate::config::Config;

/// 构建所有客户端共享的 HTTP 客户端
pub fn build_http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
