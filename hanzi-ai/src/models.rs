//! Model identifiers offered by the provider.

pub const QWEN_8B: &str = "Qwen/Qwen3-8B";
pub const QWEN_7B_INSTRUCT: &str = "Qwen/Qwen2.5-7B-Instruct";
pub const DEEPSEEK_R1_7B: &str = "deepseek-ai/DeepSeek-R1-Distill-Qwen-7B";
pub const GLM_9B: &str = "THUDM/glm-4-9b-chat";
pub const DEEPSEEK_OCR: &str = "deepseek-ai/DeepSeek-OCR";
pub const SENSE_VOICE: &str = "FunAudioLLM/SenseVoiceSmall";

/// Model used when the caller does not pick one.
pub const DEFAULT_CHAT_MODEL: &str = QWEN_8B;
