use std::time::Duration;

use crate::{env_optional, env_required};

pub(crate) const DEFAULT_API_BASE: &str = "https://api.siliconflow.cn/v1";
pub(crate) const DEFAULT_CHAT_MODEL: &str = "deepseek-ai/DeepSeek-V3";
pub(crate) const DEFAULT_EMBED_MODEL: &str = "BAAI/bge-m3";

/// System persona sent with every translation request: strict medical
/// terminology, output the result and nothing else.
pub(crate) const TRANSLATOR_PERSONA: &str =
    "你是一名医疗行业翻译专家，请对我提供的内容严格使用专业医学术语进行翻译，直接输出结果即可，不要输出其他内容。";

/// The ontology root is named with the bare word "All"; its translation is
/// a fixed constant, never a remote call.
pub(crate) const ROOT_NAME: &str = "All";
pub(crate) const ROOT_NAME_CN: &str = "所有表型";

/// Every knob the client and drivers read. Built once in main from
/// defaults, environment, and CLI flags, then passed by value; there is no
/// process-wide configuration state.
#[derive(Debug, Clone)]
pub(crate) struct EnrichConfig {
    pub(crate) api_base: String,
    pub(crate) api_token: String,
    pub(crate) chat_model: String,
    pub(crate) embed_model: String,
    pub(crate) max_tokens: u64,
    pub(crate) temperature: f64,
    pub(crate) top_p: f64,
    pub(crate) frequency_penalty: f64,
    pub(crate) presence_penalty: f64,
    pub(crate) request_timeout: Duration,
    /// Wait before the single gateway-timeout retry.
    pub(crate) timeout_cooldown: Duration,
    pub(crate) translate_pace: Duration,
    pub(crate) embed_pace: Duration,
    /// Inputs longer than this many characters are truncated before the
    /// embedding request.
    pub(crate) max_input_chars: usize,
    /// Stored vector length: the prefix kept from the raw embedding.
    pub(crate) embed_dim: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            top_p: 0.5,
            frequency_penalty: 0.2,
            presence_penalty: 0.1,
            request_timeout: Duration::from_secs(120),
            timeout_cooldown: Duration::from_secs(60),
            translate_pace: Duration::from_secs(3),
            embed_pace: Duration::from_secs(2),
            max_input_chars: 8192,
            embed_dim: 512,
        }
    }
}

impl EnrichConfig {
    /// Token and base URL come from flags first, then the environment.
    /// A missing token is a startup error, never a default.
    pub(crate) fn resolve(
        token: Option<String>,
        api_base: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let api_token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => env_required("ONTOGLOT_API_TOKEN")?,
        };
        let api_base = api_base
            .or_else(|| env_optional("ONTOGLOT_API_BASE"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self {
            api_base,
            api_token,
            ..Self::default()
        })
    }
}
