use tokenizers::Tokenizer;

use crate::{error::ServiceError, model::DecodingParams};

/// Extends `ids` one arg-max token at a time until `max_new_tokens` are
/// produced or, when enabled, `eos` is emitted. `step` maps the current
/// sequence to the next token id. Returns the number of tokens appended.
pub fn greedy_extend<F>(
    ids: &mut Vec<i64>,
    params: &DecodingParams,
    eos: i64,
    mut step: F,
) -> Result<usize, ServiceError>
where
    F: FnMut(&[i64]) -> Result<i64, ServiceError>,
{
    if params.do_sample || params.num_return_sequences != 1 {
        return Err(ServiceError::Inference(
            "only single-sequence greedy decoding is supported".into(),
        ));
    }

    let start_len = ids.len();
    for _ in 0..params.max_new_tokens {
        let next = step(ids)?;
        ids.push(next);
        if params.stop_at_eos && next == eos {
            break;
        }
    }

    Ok(ids.len() - start_len)
}

pub fn resolve_eos_id(tokenizer: &Tokenizer, eos_token: &str) -> Result<u32, ServiceError> {
    tokenizer.token_to_id(eos_token).ok_or_else(|| {
        ServiceError::Tokenizer(format!(
            "end-of-sequence token {eos_token:?} not in vocabulary"
        ))
    })
}

/// Decodes the whole sequence, prompt included. Special tokens are dropped;
/// role markers are ordinary tokens and survive.
pub fn decode_sequence(tokenizer: &Tokenizer, ids: &[i64]) -> Result<String, ServiceError> {
    let ids: Vec<u32> = ids.iter().map(|&id| id as u32).collect();
    tokenizer
        .decode(&ids, true)
        .map_err(|e| ServiceError::Tokenizer(e.to_string()))
}
