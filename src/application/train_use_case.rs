// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Load train (and optionally eval) CSV    (Layer 4)
//   Step 2: Clean + tokenise text                   (Layer 4)
//   Step 3: Build vocabulary                        (Layer 4)
//   Step 4: Load pretrained vectors (optional)      (Layer 4)
//   Step 5: Encode samples, split if no eval CSV    (Layer 4)
//   Step 6: Persist config + vocabulary             (Layer 6)
//   Step 7: Run training loop                       (Layer 5)
//   Step 8: Render the attention report             (Layer 6)
//
// Validation errors (empty dataset, dimension mismatch,
// unavailable accelerator) surface here or in device/vector
// resolution — always before the training loop starts.

use anyhow::Result;
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};

use crate::application::report_use_case::generate_report;
use crate::data::{
    dataset::{TextDataset, TextSample},
    loader::CsvRecordSource,
    preprocessor::Preprocessor,
    splitter::split_train_eval,
    vectors::{load_pretrained, EmbeddingMatrix},
    vocab::{tokenize, Vocab},
};
use crate::domain::error::PipelineError;
use crate::domain::example::LabeledText;
use crate::domain::traits::RecordSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger, vocab_store::VocabStore};
use crate::ml::device::{resolve_device, DevicePlacement};
use crate::ml::model::ModelConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Serialisable so it can be written next
// to the checkpoint and reloaded by the report command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_csv: String,
    /// Separate evaluation CSV; when None, a fraction of the
    /// training data is held out instead
    pub eval_csv: Option<String>,
    /// Pretrained word vectors in `token v1 .. vN` text format
    pub vectors_path: Option<String>,
    pub checkpoint_dir: String,
    pub report_path: String,
    pub emb_dim: usize,
    pub h_dim: usize,
    pub attn_dim: usize,
    pub n_classes: usize,
    pub lr: f64,
    pub epochs: usize,
    pub batch_size: usize,
    /// Emit a training progress line every this many batches
    pub log_interval: usize,
    /// Fraction kept for training when eval_csv is None
    pub train_fraction: f64,
    pub seed: u64,
    pub device: DevicePlacement,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csv: "data/train.csv".to_string(),
            eval_csv: Some("data/test.csv".to_string()),
            vectors_path: None,
            checkpoint_dir: "checkpoints".to_string(),
            report_path: "results/attn.tsv".to_string(),
            emb_dim: 300,
            h_dim: 32,
            attn_dim: 32,
            n_classes: 2,
            lr: 1e-3,
            epochs: 3,
            batch_size: 2,
            log_interval: 1,
            train_fraction: 0.8,
            seed: 0,
            device: DevicePlacement::Host,
        }
    }
}

/// Clean and tokenise raw records, keeping labels attached.
pub fn tokenize_records(records: &[LabeledText]) -> Vec<(Vec<String>, usize)> {
    let pre = Preprocessor::new();
    records
        .iter()
        .map(|r| (tokenize(&pre.clean(&r.text)), r.label))
        .collect()
}

/// Encode tokenised records with a vocabulary. Records whose
/// text tokenised to nothing are dropped with a warning — a
/// zero-length sequence has no valid batch representation.
pub fn encode_tokenized(tokenized: Vec<(Vec<String>, usize)>, vocab: &Vocab) -> Vec<TextSample> {
    tokenized
        .into_iter()
        .filter(|(tokens, _)| {
            if tokens.is_empty() {
                tracing::warn!("Dropping record with empty text");
            }
            !tokens.is_empty()
        })
        .map(|(tokens, label)| TextSample {
            token_ids: vocab.encode(&tokens),
            label,
        })
        .collect()
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load records ──────────────────────────────────────────────
        let train_records = CsvRecordSource::new(&cfg.train_csv).load_all()?;
        if train_records.is_empty() {
            return Err(PipelineError::config(format!(
                "training dataset '{}' is empty",
                cfg.train_csv
            ))
            .into());
        }

        // ── Step 2 + 3: Tokenise and build the vocabulary ─────────────────────
        // The vocabulary is built from training text only
        let train_tokenized = tokenize_records(&train_records);
        let vocab = Vocab::build(train_tokenized.iter().map(|(t, _)| t.as_slice()));
        tracing::info!("Vocabulary: {} tokens", vocab.len());

        // ── Step 4: Pretrained vectors (optional) ─────────────────────────────
        // A dimension mismatch aborts here, before any training
        let pretrained: Option<EmbeddingMatrix> = cfg
            .vectors_path
            .as_ref()
            .map(|path| load_pretrained(path, &vocab, cfg.emb_dim, cfg.seed))
            .transpose()?;

        // ── Step 5: Encode and split ──────────────────────────────────────────
        let train_samples = encode_tokenized(train_tokenized, &vocab);

        let (train_samples, eval_samples) = match &cfg.eval_csv {
            Some(path) => {
                let eval_records = CsvRecordSource::new(path).load_all()?;
                let eval_samples = encode_tokenized(tokenize_records(&eval_records), &vocab);
                (train_samples, eval_samples)
            }
            None => split_train_eval(train_samples, cfg.train_fraction, cfg.seed),
        };

        if eval_samples.is_empty() {
            return Err(PipelineError::config("evaluation dataset is empty").into());
        }
        tracing::info!(
            "Datasets: {} train, {} evaluation",
            train_samples.len(),
            eval_samples.len()
        );

        // ── Step 6: Persist config + vocabulary ───────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        VocabStore::new(&cfg.checkpoint_dir).save(&vocab)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 7: Train ─────────────────────────────────────────────────────
        let model_cfg = ModelConfig::new(vocab.len(), cfg.emb_dim, cfg.h_dim, cfg.n_classes)
            .with_attn_dim(cfg.attn_dim);

        let train_dataset = TextDataset::new(train_samples);
        let eval_dataset = TextDataset::new(eval_samples.clone());

        let model = run_training(
            cfg,
            &model_cfg,
            pretrained.as_ref(),
            train_dataset,
            eval_dataset,
            &ckpt_manager,
            &metrics,
        )?;

        // ── Step 8: Attention report ──────────────────────────────────────────
        // Re-drive the evaluation set through the trained model
        // (read-only, eval phase) to capture attention weights
        let device = resolve_device(cfg.device)?;
        let records = generate_report(
            &model.valid(),
            eval_samples,
            &vocab,
            cfg.batch_size,
            &device,
            &cfg.report_path,
        )?;
        tracing::info!("Attention report: {} records at '{}'", records, cfg.report_path);

        Ok(())
    }
}
