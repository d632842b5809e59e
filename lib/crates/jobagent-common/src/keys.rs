/// Recognized `.env` key names.
pub mod names {
    /// Base directory of the project tree (holds `.env` and `venv/`).
    pub const PROJECT_BASE_DIR: &str = "PROJECT_BASE_DIR";

    /// Host directory with the compiled inference engine.
    pub const ENGINE_DIR: &str = "ENGINE_DIR";

    /// Legacy spelling of `ENGINE_DIR`, read only as a fallback.
    pub const MODEL_ENGINE_DIR: &str = "MODEL_ENGINE_DIR";

    /// Host directory with the tokenizer files.
    pub const TOKENIZER_DIR: &str = "TOKENIZER_DIR";

    /// Container image reference for the inference server.
    pub const TLLM_IMAGE: &str = "TLLM_IMAGE";

    /// Name of the managed container.
    pub const CONTAINER_NAME: &str = "CONTAINER_NAME";

    /// Port of the OpenAI-compatible endpoint.
    pub const OPENAI_PORT: &str = "OPENAI_PORT";

    /// Engine rebuild flag passed through to the container.
    pub const FORCE_BUILD: &str = "FORCE_BUILD";

    /// Hugging Face access token. Filled in by a human, never overwritten.
    pub const HUGGINGFACE_TOKEN: &str = "HUGGINGFACE_TOKEN";

    /// Optional host cache directory mounted into the container.
    pub const HUGGINGFACE_CACHE_DIR: &str = "HUGGINGFACE_CACHE_DIR";

    /// Chat-completions URL probed by `check-llm` and handed to the agent.
    pub const LLM_API_URL: &str = "LLM_API_URL";
}

/// Built-in defaults, used when neither the environment nor `.env` sets a key.
pub mod defaults {
    pub const ENGINE_DIR: &str =
        "/mnt/ssd/llm_models/tensorrt_llm_engines/Llama-2-7b-chat-hf-gptq";
    pub const TOKENIZER_DIR: &str = "/mnt/ssd/llm_models/hf_models/Llama-2-7b-chat-hf";
    pub const TLLM_IMAGE: &str = "dustynv/tensorrt_llm:0.12-r36.4.0";
    pub const CONTAINER_NAME: &str = "trt_llm_server";
    pub const OPENAI_PORT: u16 = 8000;
    pub const FORCE_BUILD: &str = "off";

    /// Directory name of the default project base, relative to `$HOME`.
    pub const BASE_DIR_NAME: &str = "ai-job-agent";

    /// Chat-completions URL for a server listening on `port` on this host.
    #[must_use]
    pub fn llm_api_url(port: u16) -> String {
        format!("http://localhost:{port}/v1/chat/completions")
    }
}

/// Keys the bootstrapper writes with exact-key upsert semantics, in file order.
///
/// `PROJECT_BASE_DIR` and `HUGGINGFACE_TOKEN` are handled separately: the
/// former is always the bootstrap base path, the latter is insert-only.
pub const SEEDED_KEYS: &[&str] = &[
    names::ENGINE_DIR,
    names::TOKENIZER_DIR,
    names::TLLM_IMAGE,
    names::CONTAINER_NAME,
    names::OPENAI_PORT,
    names::FORCE_BUILD,
];

/// Built-in default for a seeded key, if it has one.
#[must_use]
pub fn seeded_default(key: &str) -> Option<String> {
    match key {
        names::ENGINE_DIR => Some(defaults::ENGINE_DIR.to_string()),
        names::TOKENIZER_DIR => Some(defaults::TOKENIZER_DIR.to_string()),
        names::TLLM_IMAGE => Some(defaults::TLLM_IMAGE.to_string()),
        names::CONTAINER_NAME => Some(defaults::CONTAINER_NAME.to_string()),
        names::OPENAI_PORT => Some(defaults::OPENAI_PORT.to_string()),
        names::FORCE_BUILD => Some(defaults::FORCE_BUILD.to_string()),
        _ => None,
    }
}
