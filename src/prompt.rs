//! TinyLlama chat template for the enrichment instruction.

pub const SYSTEM_MARKER: &str = "<|system|>";
pub const USER_MARKER: &str = "<|user|>";
pub const ASSISTANT_MARKER: &str = "<|assistant|>";

pub const SYSTEM_DIRECTIVE: &str = "You are a helpful assistant that improves image generation prompts by adding only concise, objective physical appearance details to the objects mentioned in the prompt. Describe only factual attributes such as size, shape, color, texture, and arrangement. Do not introduce any new objects, background elements, or narrative context. ";

pub const TASK_DIRECTIVE: &str = "Enrich this prompt with visual details: ";

/// Inserts `raw_prompt` verbatim; the result always ends with [`ASSISTANT_MARKER`].
pub fn format_instruction(raw_prompt: &str) -> String {
    format!(
        "{SYSTEM_MARKER}\n{SYSTEM_DIRECTIVE}\n{USER_MARKER}\n{TASK_DIRECTIVE}{raw_prompt}\n{ASSISTANT_MARKER}"
    )
}
