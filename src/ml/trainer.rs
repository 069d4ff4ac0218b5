// ============================================================
// Layer 5 — Training and Evaluation Loops
// ============================================================
// Hand-rolled epoch loop over Burn's DataLoader with Adam.
//
// Per batch: validate shapes, forward (train phase), NLL loss,
// finiteness check, backward, one optimiser step, prediction
// tally. A progress line is emitted every `log_interval`
// batches with the running accuracy since the previous line
// (the accumulator resets at each emission) and the last batch
// loss.
//
// Evaluation runs the identical forward computation on the
// inner (non-autodiff) backend via model.valid() — no gradient
// tracking, no parameter mutation — and reports whole-set
// accuracy once per call.
//
// Failure semantics: a NaN/Inf loss aborts the run with the
// epoch and batch index; shape problems abort at the first
// offending batch. Nothing is retried and no batch is skipped.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{TextBatch, TextBatcher};
use crate::data::dataset::TextDataset;
use crate::data::vectors::EmbeddingMatrix;
use crate::domain::error::PipelineError;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::device::{resolve_device, EvalBackend, TrainBackend};
use crate::ml::model::{AttnTextModel, ModelConfig};
use crate::ml::Phase;

/// Train the model and return it (still on the autodiff
/// backend) so the caller can drive the attention report.
pub fn run_training(
    cfg: &TrainConfig,
    model_cfg: &ModelConfig,
    pretrained: Option<&EmbeddingMatrix>,
    train_dataset: TextDataset,
    eval_dataset: TextDataset,
    ckpt_manager: &CheckpointManager,
    metrics: &MetricsLogger,
) -> Result<AttnTextModel<TrainBackend>> {
    // Both knobs are divisors/loop strides further down; zero is
    // a configuration error, caught before any computation.
    if cfg.batch_size == 0 {
        return Err(PipelineError::config("batch_size must be at least 1").into());
    }
    if cfg.log_interval == 0 {
        return Err(PipelineError::config("log_interval must be at least 1").into());
    }

    // Device placement is resolved before any computation;
    // an unavailable accelerator is a configuration error here,
    // never a silent fallback later.
    let device = resolve_device(cfg.device)?;
    tracing::info!("Using device: {:?}", device);

    // Seed before parameter init so two runs with the same seed
    // produce identical initial parameters and identical updates.
    TrainBackend::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: AttnTextModel<TrainBackend> = model_cfg.init(&device);
    if let Some(matrix) = pretrained {
        model = model.with_pretrained_embeddings(matrix, &device);
    }
    tracing::info!(
        "Model ready: emb_dim={}, h_dim={}, classes={}",
        model_cfg.emb_dim,
        model_cfg.h_dim,
        model_cfg.n_classes
    );

    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    let total_examples = train_dataset.sample_count();

    // ── Training data loader (autodiff backend) ───────────────────────────────
    let train_batcher = TextBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Evaluation data loader (inner backend, no autodiff) ───────────────────
    let eval_batcher = TextBatcher::<EvalBackend>::new(device.clone());
    let eval_loader = DataLoaderBuilder::new(eval_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;
        let mut epoch_correct = 0usize;
        let mut epoch_seen = 0usize;

        // Interval accumulators, reset at every progress line
        let mut correct = 0usize;
        let mut seen = 0usize;
        let mut processed = 0usize;

        for (idx, batch) in train_loader.iter().enumerate() {
            batch.validate(epoch, idx)?;

            let (loss, output) =
                model.forward_loss(batch.tokens.clone(), Some(&batch.lengths), batch.labels.clone());

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            if !loss_val.is_finite() {
                return Err(PipelineError::NonFiniteLoss {
                    epoch,
                    batch: idx,
                    value: loss_val,
                }
                .into());
            }
            loss_sum += loss_val;
            batches += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);

            let batch_correct = count_correct(&output.log_probs, &batch);
            correct += batch_correct;
            epoch_correct += batch_correct;
            seen += batch.batch_size;
            epoch_seen += batch.batch_size;
            processed += batch.batch_size;

            if (idx + 1) % cfg.log_interval == 0 {
                tracing::info!(
                    "train epoch {}: [{}/{}] acc={:.3} loss={:.4}",
                    epoch,
                    processed,
                    total_examples,
                    correct as f64 / seen.max(1) as f64,
                    loss_val,
                );
                correct = 0;
                seen = 0;
            }
        }

        let avg_train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc = if epoch_seen > 0 {
            epoch_correct as f64 / epoch_seen as f64
        } else {
            0.0
        };

        // ── Evaluation phase ──────────────────────────────────────────────────
        // model.valid() → AttnTextModel<EvalBackend>; read-only
        let eval_acc = run_evaluation(&model.valid(), eval_loader.iter());

        tracing::info!(
            "epoch {:>2}/{} | train_loss={:.4} | train_acc={:.1}% | eval_acc={:.1}%",
            epoch,
            cfg.epochs,
            avg_train_loss,
            train_acc * 100.0,
            eval_acc * 100.0,
        );

        metrics.log(&EpochMetrics::new(epoch, avg_train_loss, train_acc, eval_acc))?;
    }

    // One snapshot after the final epoch — the trained artifact
    ckpt_manager.save_model(&model, cfg.epochs)?;
    tracing::info!("Training complete, checkpoint saved");

    Ok(model)
}

/// Accuracy of `model` over every batch the iterator yields.
/// Pure read access: no gradients, no parameter or optimiser
/// state is touched.
pub fn run_evaluation<I>(model: &AttnTextModel<EvalBackend>, batches: I) -> f64
where
    I: Iterator<Item = TextBatch<EvalBackend>>,
{
    let mut correct = 0usize;
    let mut total = 0usize;

    for batch in batches {
        let output = model.forward(batch.tokens.clone(), Some(&batch.lengths), Phase::Eval);
        correct += count_correct(&output.log_probs, &batch);
        total += batch.batch_size;
    }

    if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    }
}

/// How many predictions in this batch match the labels.
/// argmax(1) returns [batch, 1], so flatten before comparing
/// with the [batch]-shaped label tensor.
fn count_correct<B: Backend>(log_probs: &Tensor<B, 2>, batch: &TextBatch<B>) -> usize {
    let predictions = log_probs.clone().argmax(1).flatten::<1>(0, 1);
    let agreed: i64 = predictions
        .equal(batch.labels.clone())
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    agreed as usize
}
