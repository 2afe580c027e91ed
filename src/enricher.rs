use std::{sync::Arc, time::Instant};

use tracing::info;

use crate::{
    error::ServiceError,
    model::{DecodingParams, ModelMetadata, TextCompletion},
    prompt::format_instruction,
    sanitize::sanitize_completion,
};

/// Formats a prompt, runs it through the completion service and keeps only
/// the complete sentences of the reply.
#[derive(Clone)]
pub struct PromptEnricher {
    completion: Arc<dyn TextCompletion>,
    params: DecodingParams,
}

impl PromptEnricher {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            completion,
            params: DecodingParams::default(),
        }
    }

    pub fn decoding_params(&self) -> DecodingParams {
        self.params
    }

    pub fn model_metadata(&self) -> Option<ModelMetadata> {
        self.completion.metadata()
    }

    pub async fn enrich(&self, prompt: &str) -> Result<String, ServiceError> {
        let formatted = format_instruction(prompt);

        let start = Instant::now();
        let raw = self.completion.complete(&formatted, &self.params).await?;
        let elapsed = start.elapsed();

        let enriched = sanitize_completion(&raw);

        info!(original = %prompt, "original prompt");
        info!(enriched = %enriched, "enriched prompt");
        info!(elapsed_ms = elapsed.as_millis() as u64, "enrichment time");

        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;

    /// Echoes the instruction followed by a canned continuation, recording
    /// what it was asked.
    struct EchoCompletion {
        continuation: String,
        seen: Mutex<Vec<(String, DecodingParams)>>,
    }

    impl EchoCompletion {
        fn new(continuation: &str) -> Arc<Self> {
            Arc::new(Self {
                continuation: continuation.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextCompletion for EchoCompletion {
        async fn complete(
            &self,
            formatted: &str,
            params: &DecodingParams,
        ) -> Result<String, ServiceError> {
            self.seen.lock().push((formatted.to_string(), *params));
            Ok(format!("{formatted}{}", self.continuation))
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl TextCompletion for FailingCompletion {
        async fn complete(&self, _: &str, _: &DecodingParams) -> Result<String, ServiceError> {
            Err(ServiceError::Inference("out of memory".into()))
        }
    }

    #[tokio::test]
    async fn keeps_only_complete_sentences_of_reply() {
        let stub = EchoCompletion::new(" It is round and smooth. It has a glossy");
        let enricher = PromptEnricher::new(stub.clone());

        let enriched = enricher.enrich("a red ball").await.unwrap();
        assert_eq!(enriched, "It is round and smooth.");
    }

    #[tokio::test]
    async fn sends_formatted_instruction_with_fixed_params() {
        let stub = EchoCompletion::new(" Smooth.");
        let enricher = PromptEnricher::new(stub.clone());

        enricher.enrich("a blue cube").await.unwrap();

        let seen = stub.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, format_instruction("a blue cube"));
        assert_eq!(seen[0].1, DecodingParams::GREEDY);
        assert_eq!(seen[0].1.max_new_tokens, 100);
        assert!(!seen[0].1.do_sample);
    }

    #[tokio::test]
    async fn reply_without_sentence_is_empty_not_error() {
        let enricher = PromptEnricher::new(EchoCompletion::new(" a shiny red sphere with"));
        assert_eq!(enricher.enrich("a red ball").await.unwrap(), "");
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let enricher = PromptEnricher::new(Arc::new(FailingCompletion));
        let err = enricher.enrich("a red ball").await.unwrap_err();
        assert!(matches!(err, ServiceError::Inference(_)));
    }
}
