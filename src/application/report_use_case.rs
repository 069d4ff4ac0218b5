// ============================================================
// Layer 2 — ReportUseCase
// ============================================================
// Turns a trained model plus an evaluation set into the
// colour-coded attention report. Used in two places:
//
//   - at the end of every training run, on the freshly trained
//     model (see train_use_case)
//   - standalone via the `report` command, which rebuilds the
//     model from the latest checkpoint
//
// Batches flow through the model in evaluation phase; per
// example, the padded tail is cut off using the true length
// before tokens and weights are rendered, so <pad> never shows
// up in the report.

use anyhow::Result;
use burn::{data::dataloader::DataLoaderBuilder, prelude::*, tensor::TensorData};

use crate::application::train_use_case::{encode_tokenized, tokenize_records};
use crate::data::{
    batcher::TextBatcher,
    dataset::{TextDataset, TextSample},
    loader::CsvRecordSource,
    splitter::split_train_eval,
    vocab::Vocab,
};
use crate::domain::error::PipelineError;
use crate::domain::traits::RecordSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    report::{write_report, ReportRecord},
    vocab_store::VocabStore,
};
use crate::ml::device::{resolve_device, EvalBackend};
use crate::ml::model::{AttnTextModel, ModelConfig};
use crate::ml::Phase;

/// Read a tensor back to the host as a plain Vec, converting
/// the element type first so the readback cannot mismatch the
/// backend's native int/float width.
fn readback<E: burn::tensor::Element>(data: TensorData) -> Result<Vec<E>> {
    data.convert::<E>()
        .to_vec()
        .map_err(|e| anyhow::anyhow!("tensor readback failed: {e:?}"))
}

/// Run `samples` through `model` in evaluation phase and write
/// one TSV record per example, in dataset order. Returns the
/// number of records written.
pub fn generate_report<B: Backend>(
    model: &AttnTextModel<B>,
    samples: Vec<TextSample>,
    vocab: &Vocab,
    batch_size: usize,
    device: &B::Device,
    out_path: &str,
) -> Result<usize> {
    let total = samples.len();

    // No .shuffle(): report rows must line up with the dataset
    let loader = DataLoaderBuilder::new(TextBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .num_workers(1)
        .build(TextDataset::new(samples));

    let mut records: Vec<ReportRecord> = Vec::with_capacity(total);
    for batch in loader.iter() {
        let output = model.forward(batch.tokens.clone(), Some(&batch.lengths), Phase::Eval);

        let preds: Vec<i64> =
            readback(output.log_probs.argmax(1).flatten::<1>(0, 1).into_data())?;
        let labels: Vec<i64> = readback(batch.labels.into_data())?;
        let token_ids: Vec<i64> = readback(batch.tokens.into_data())?;
        let weights: Vec<f32> = readback(output.attention.into_data())?;

        for (i, &len) in batch.raw_lengths.iter().enumerate() {
            let start = i * batch.seq_len;
            let tokens: Vec<String> = token_ids[start..start + len]
                .iter()
                .map(|&id| vocab.token(id as usize).to_string())
                .collect();

            records.push(ReportRecord::new(
                labels[i] as usize,
                preds[i] as usize,
                &tokens,
                &weights[start..start + len],
            ));
        }
    }

    write_report(out_path, &records)?;
    Ok(records.len())
}

// ─── ReportUseCase ────────────────────────────────────────────────────────────
/// Standalone report generation from the latest checkpoint.
pub struct ReportUseCase {
    checkpoint_dir: String,
    /// Overrides the CSV recorded in the saved config
    eval_csv: Option<String>,
    /// Overrides the output path recorded in the saved config
    report_path: Option<String>,
}

impl ReportUseCase {
    pub fn new(
        checkpoint_dir: String,
        eval_csv: Option<String>,
        report_path: Option<String>,
    ) -> Self {
        Self { checkpoint_dir, eval_csv, report_path }
    }

    pub fn execute(&self) -> Result<()> {
        let ckpt_manager = CheckpointManager::new(self.checkpoint_dir.as_str());
        let cfg = ckpt_manager.load_config()?;
        let vocab = VocabStore::new(self.checkpoint_dir.as_str()).load()?;
        let device = resolve_device(cfg.device)?;

        // Rebuild the architecture the config describes, then
        // fill it from the latest checkpoint
        let model = ModelConfig::new(vocab.len(), cfg.emb_dim, cfg.h_dim, cfg.n_classes)
            .with_attn_dim(cfg.attn_dim)
            .init::<EvalBackend>(&device);
        let model = ckpt_manager.load_model(model, &device)?;

        let samples = match self.eval_csv.as_ref().or(cfg.eval_csv.as_ref()) {
            Some(path) => {
                let records = CsvRecordSource::new(path).load_all()?;
                encode_tokenized(tokenize_records(&records), &vocab)
            }
            None => {
                // The training run held out a seeded split of the
                // training CSV; the same seed recreates it exactly
                let records = CsvRecordSource::new(&cfg.train_csv).load_all()?;
                let samples = encode_tokenized(tokenize_records(&records), &vocab);
                split_train_eval(samples, cfg.train_fraction, cfg.seed).1
            }
        };
        if samples.is_empty() {
            return Err(PipelineError::config("evaluation dataset is empty").into());
        }

        let out_path = self.report_path.as_deref().unwrap_or(&cfg.report_path);
        let written = generate_report(&model, samples, &vocab, cfg.batch_size, &device, out_path)?;
        tracing::info!("Attention report: {} records at '{}'", written, out_path);
        Ok(())
    }
}
