use serde::Serialize;

/// How the completion service decodes. Fixed for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodingParams {
    pub max_new_tokens: usize,
    pub do_sample: bool,
    pub num_return_sequences: usize,
    pub stop_at_eos: bool,
}

impl DecodingParams {
    pub const GREEDY: DecodingParams = DecodingParams {
        max_new_tokens: 100,
        do_sample: false,
        num_return_sequences: 1,
        stop_at_eos: true,
    };
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self::GREEDY
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub dtype: String,
    pub device: String,
    pub size_bytes: u64,
}
