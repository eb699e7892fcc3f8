//! Local embedding backend: ONNX inference via `tract`.
//!
//! Pipeline per call: role prefix → tokenize (truncated) → pad batch →
//! forward pass → mean-pool over tokens if the output is per-token →
//! L2-normalize. Batching (default 64) exists purely for throughput and
//! must not change any output vector versus unbatched processing.
//!
//! The plan and tokenizer are shared via `Arc` and tolerate concurrent
//! invocation; the forward pass runs under `spawn_blocking` so it does not
//! stall the async runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokenizers::Tokenizer;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::pooling::{l2_normalize, mean_pool};
use crate::{BoxFuture, EmbedError, EmbedSettings, EmbeddingProvider, LOCAL_EMBED_DIM};

/// Role prefix the local model expects on document/passage inputs.
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Role prefix the local model expects on query inputs.
pub const QUERY_PREFIX: &str = "query: ";

/// File names probed, in order, for the ONNX graph inside the model dir.
const MODEL_CANDIDATES: [&str; 4] = [
    "model.onnx",
    "model_quantized.onnx",
    "model_fp16.onnx",
    "bge-m3.onnx",
];

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Embedding provider backed by a local ONNX model.
pub struct LocalOnnxEmbedder {
    plan: Arc<TractModel>,
    tokenizer: Arc<Tokenizer>,
    max_tokens: usize,
    batch_size: usize,
    dim: usize,
    wants_type_ids: bool,
}

impl LocalOnnxEmbedder {
    /// Loads the ONNX graph and tokenizer from `settings.model_dir`.
    ///
    /// # Errors
    /// Returns [`EmbedError::ModelArtifact`] naming the directory when the
    /// `.onnx` file or `tokenizer.json` is missing, and
    /// [`EmbedError::Inference`] when the graph cannot be compiled.
    pub fn load(settings: &EmbedSettings) -> Result<Self, EmbedError> {
        let model_path = locate_onnx_model(&settings.model_dir)?;

        let tokenizer_path = settings.model_dir.join("tokenizer.json");
        if !tokenizer_path.exists() {
            return Err(EmbedError::ModelArtifact(format!(
                "tokenizer.json not found under {}",
                settings.model_dir.display()
            )));
        }
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedError::Tokenizer(e.to_string()))?;

        debug!("loading ONNX graph from {}", model_path.display());
        let plan = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| EmbedError::Inference(e.to_string()))?
            .into_optimized()
            .map_err(|e| EmbedError::Inference(e.to_string()))?
            .into_runnable()
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let wants_type_ids = plan.model().inputs.len() >= 3;

        Ok(Self {
            plan: Arc::new(plan),
            tokenizer: Arc::new(tokenizer),
            max_tokens: settings.max_tokens,
            batch_size: settings.batch_size.max(1),
            dim: settings.dim.unwrap_or(LOCAL_EMBED_DIM),
            wants_type_ids,
        })
    }

    fn embed_with_prefix<'a>(
        &'a self,
        texts: &'a [String],
        prefix: &'static str,
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>> {
        Box::pin(async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }

            let inputs = apply_role_prefix(texts, prefix);
            let plan = Arc::clone(&self.plan);
            let tokenizer = Arc::clone(&self.tokenizer);
            let max_tokens = self.max_tokens;
            let batch_size = self.batch_size;
            let wants_type_ids = self.wants_type_ids;

            let vectors = tokio::task::spawn_blocking(move || {
                let mut out = Vec::with_capacity(inputs.len());
                for batch in inputs.chunks(batch_size) {
                    out.extend(run_batch(
                        &plan,
                        &tokenizer,
                        batch,
                        max_tokens,
                        wants_type_ids,
                    )?);
                }
                Ok::<_, EmbedError>(out)
            })
            .await
            .map_err(|e| EmbedError::Inference(format!("blocking task failed: {e}")))??;

            for v in &vectors {
                if v.len() != self.dim {
                    return Err(EmbedError::VectorSizeMismatch {
                        got: v.len(),
                        want: self.dim,
                    });
                }
            }
            Ok(vectors)
        })
    }
}

impl EmbeddingProvider for LocalOnnxEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_documents<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>> {
        self.embed_with_prefix(texts, PASSAGE_PREFIX)
    }

    fn embed_queries<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>> {
        self.embed_with_prefix(texts, QUERY_PREFIX)
    }
}

/// Prepends the role prefix to each trimmed input.
fn apply_role_prefix(texts: &[String], prefix: &str) -> Vec<String> {
    texts
        .iter()
        .map(|t| format!("{prefix}{}", t.trim()))
        .collect()
}

/// Locates the ONNX graph inside the model directory: well-known file names
/// first, then any `*.onnx` entry.
fn locate_onnx_model(dir: &Path) -> Result<PathBuf, EmbedError> {
    for name in MODEL_CANDIDATES {
        let p = dir.join(name);
        if p.exists() {
            return Ok(p);
        }
    }
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.extension().is_some_and(|ext| ext == "onnx") {
                return Ok(p);
            }
        }
    }
    Err(EmbedError::ModelArtifact(format!(
        "no .onnx model found under {}",
        dir.display()
    )))
}

/// Token ids and masks for one input, truncated to the model limit.
struct TokenizedInput {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

fn encode_truncated(
    tokenizer: &Tokenizer,
    text: &str,
    max_tokens: usize,
) -> Result<TokenizedInput, EmbedError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| EmbedError::Tokenizer(e.to_string()))?;

    let mut input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let mut attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let mut token_type_ids: Vec<i64> =
        encoding.get_type_ids().iter().map(|&id| id as i64).collect();

    input_ids.truncate(max_tokens);
    attention_mask.truncate(max_tokens);
    token_type_ids.truncate(max_tokens);

    Ok(TokenizedInput {
        input_ids,
        attention_mask,
        token_type_ids,
    })
}

/// Tokenizes, pads, runs the forward pass, pools, and normalizes one batch.
fn run_batch(
    plan: &TractModel,
    tokenizer: &Tokenizer,
    batch: &[String],
    max_tokens: usize,
    wants_type_ids: bool,
) -> Result<Vec<Vec<f32>>, EmbedError> {
    let mut encoded = Vec::with_capacity(batch.len());
    for text in batch {
        encoded.push(encode_truncated(tokenizer, text, max_tokens)?);
    }

    let rows = encoded.len();
    let seq = encoded
        .iter()
        .map(|e| e.input_ids.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut ids = Vec::with_capacity(rows * seq);
    let mut mask = Vec::with_capacity(rows * seq);
    let mut type_ids = Vec::with_capacity(rows * seq);
    for e in &encoded {
        let pad = seq - e.input_ids.len();
        ids.extend_from_slice(&e.input_ids);
        ids.extend(std::iter::repeat(0i64).take(pad));
        mask.extend_from_slice(&e.attention_mask);
        mask.extend(std::iter::repeat(0i64).take(pad));
        type_ids.extend_from_slice(&e.token_type_ids);
        type_ids.extend(std::iter::repeat(0i64).take(pad));
    }

    let input_ids = Tensor::from_shape(&[rows, seq], &ids)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;
    let attention_mask = Tensor::from_shape(&[rows, seq], &mask)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    let mut inputs: TVec<TValue> = tvec![input_ids.into(), attention_mask.into()];
    if wants_type_ids {
        let token_type_ids = Tensor::from_shape(&[rows, seq], &type_ids)
            .map_err(|e| EmbedError::Inference(e.to_string()))?;
        inputs.push(token_type_ids.into());
    }

    let outputs = plan
        .run(inputs)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    let first = &outputs[0];
    let shape = first.shape().to_vec();
    let data = first
        .as_slice::<f32>()
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    // Per-token output gets mean-pooled; pre-pooled output is used as-is.
    let mut pooled = match shape.as_slice() {
        [b, t, h] => mean_pool(data, *b, *t, *h, &mask),
        [_, h] => data.chunks(*h).map(|row| row.to_vec()).collect(),
        other => {
            return Err(EmbedError::Inference(format!(
                "unexpected output shape {other:?}"
            )));
        }
    };

    for v in &mut pooled {
        l2_normalize(v);
    }
    Ok(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_and_query_prefixes_differ() {
        // Asymmetric models rely on the two roles staying distinct.
        assert_ne!(PASSAGE_PREFIX, QUERY_PREFIX);
    }

    #[test]
    fn role_prefix_is_applied_per_role() {
        let texts = vec!["  Picard group  ".to_string()];
        let docs = apply_role_prefix(&texts, PASSAGE_PREFIX);
        let queries = apply_role_prefix(&texts, QUERY_PREFIX);
        assert_eq!(docs[0], "passage: Picard group");
        assert_eq!(queries[0], "query: Picard group");
        assert_ne!(docs[0], queries[0]);
    }

    #[test]
    fn locate_prefers_candidate_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("whatever.onnx"), b"x").unwrap();
        std::fs::write(dir.path().join("model.onnx"), b"x").unwrap();
        let found = locate_onnx_model(dir.path()).unwrap();
        assert!(found.ends_with("model.onnx"));
    }

    #[test]
    fn locate_falls_back_to_extension_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exported.onnx"), b"x").unwrap();
        let found = locate_onnx_model(dir.path()).unwrap();
        assert!(found.ends_with("exported.onnx"));
    }

    #[test]
    fn locate_missing_model_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_onnx_model(dir.path()).unwrap_err();
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }
}
