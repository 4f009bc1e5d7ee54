/// Vertex AI Gemini `generateContent` 客户端
///
/// 模型、系统指令与采样参数在构建时确定，整次运行复用。
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::TokenProvider;
use crate::config::Config;
use crate::error::{AppResult, GenerationError};
use crate::infrastructure::Generator;
use crate::models::settings::HARM_CATEGORIES;
use crate::models::{GenerationRequest, GenerationSettings};

// ========== 请求体 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
    #[serde(default, skip_serializing)]
    thought: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

// ========== 响应体 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }
}

pub struct VertexClient {
    http: reqwest::Client,
    auth: Arc<TokenProvider>,
    endpoint: String,
    model: String,
    system_instruction: String,
    settings: GenerationSettings,
}

impl VertexClient {
    pub fn new(
        http: reqwest::Client,
        auth: Arc<TokenProvider>,
        config: &Config,
        system_instruction: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        let endpoint = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            config.vertex_api_base_url.trim_end_matches('/'),
            config.project_id,
            config.region,
            config.model_name
        );
        Self {
            http,
            auth,
            endpoint,
            model: config.model_name.clone(),
            system_instruction: system_instruction.into(),
            settings,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 构建请求体：先图片，后文本
    fn build_body(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let image_part = Part {
            file_data: Some(FileData {
                mime_type: request.image.mime_type.clone(),
                file_uri: request.image.uri.clone(),
            }),
            ..Default::default()
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![image_part, Part::text(&request.prompt)],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(&self.system_instruction)],
            },
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                max_output_tokens: self.settings.max_output_tokens,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: self.settings.safety_threshold.clone(),
                })
                .collect(),
        }
    }
}

/// 拼接第一个候选的全部文本（忽略思考片段）
fn extract_text(model: &str, response: GenerateContentResponse) -> Result<String, GenerationError> {
    let empty = |reason: String| GenerationError::EmptyResponse {
        model: model.to_string(),
        reason,
    };

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("请求被拦截: {}", r))
            .unwrap_or_else(|| "没有候选结果".to_string());
        return Err(empty(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| p.thought != Some(true))
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("finishReason={}", r))
            .unwrap_or_else(|| "候选结果不含文本".to_string());
        return Err(empty(reason));
    }

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!("生成提前结束 (finishReason={})，结果可能不完整", reason);
        }
    }

    Ok(text)
}

#[async_trait]
impl Generator for VertexClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        debug!("调用生成 API，模型: {}, 图片: {}", self.model, request.image.uri);

        let token = self.auth.token().await?;
        let body = self.build_body(request);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::request_failed(&self.model, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::BadStatus {
                model: self.model.clone(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::DecodeFailed {
                model: self.model.clone(),
                source: Box::new(e),
            })?;

        debug!("生成 API 调用成功");
        Ok(extract_text(&self.model, parsed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageReference;
    use serde_json::{json, Value};

    fn client() -> VertexClient {
        let http = reqwest::Client::new();
        let auth = Arc::new(TokenProvider::with_static_token(http.clone(), "t"));
        let config = Config::from_lookup(|name| match name {
            "GCP_PROJECT" => Some("demo-project".to_string()),
            "INPUT_BUCKET_NAME" => Some("exam-shots".to_string()),
            "OUTPUT_BUCKET_NAME" => Some("exam-answers".to_string()),
            "VERTEX_API_BASE_URL" => {
                Some("https://us-central1-aiplatform.googleapis.com/".to_string())
            }
            _ => None,
        })
        .unwrap();
        VertexClient::new(
            http,
            auth,
            &config,
            "Eres un tutor experto.",
            GenerationSettings::default(),
        )
    }

    fn parse(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_endpoint_format() {
        assert_eq!(
            client().endpoint(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo-project/locations/us-central1/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest::new(
            ImageReference {
                uri: "gs://exam-shots/folder/Q2.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
            },
            "Analiza esta pregunta.",
        );
        let body = serde_json::to_value(client().build_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0],
            json!({"fileData": {"mimeType": "image/jpeg", "fileUri": "gs://exam-shots/folder/Q2.jpg"}})
        );
        assert_eq!(
            body["contents"][0]["parts"][1],
            json!({"text": "Analiza esta pregunta."})
        );
        assert_eq!(
            body["systemInstruction"],
            json!({"parts": [{"text": "Eres un tutor experto."}]})
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["generationConfig"]["topP"].as_f64().unwrap() as f32, 0.95);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "# Pregunta 1\n"},
                    {"text": "## 1. Transcripción"}
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(
            extract_text("m", response).unwrap(),
            "# Pregunta 1\n## 1. Transcripción"
        );
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        match extract_text("m", response).unwrap_err() {
            GenerationError::EmptyResponse { reason, .. } => assert!(reason.contains("SAFETY")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_candidate_without_text() {
        let response = parse(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }));
        match extract_text("m", response).unwrap_err() {
            GenerationError::EmptyResponse { reason, .. } => {
                assert_eq!(reason, "finishReason=MAX_TOKENS")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
