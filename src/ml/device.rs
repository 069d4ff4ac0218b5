// ============================================================
// Layer 5 — Device Placement
// ============================================================
// Where tensors live is an explicit configuration value, not a
// boolean plus ambient GPU context. Host is the default; the
// accelerator path exists only when the crate is compiled with
// the `accel` feature, and asking for an accelerator without it
// is a configuration error raised before any computation — not
// a silent fallback to the host.

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Requested placement for all model tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevicePlacement {
    /// CPU execution on the ndarray backend
    Host,
    /// GPU execution on the wgpu backend (device index)
    Accelerator(usize),
}

impl Default for DevicePlacement {
    fn default() -> Self {
        Self::Host
    }
}

#[cfg(feature = "accel")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
#[cfg(feature = "accel")]
pub type EvalBackend = burn::backend::Wgpu;

#[cfg(not(feature = "accel"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
#[cfg(not(feature = "accel"))]
pub type EvalBackend = burn::backend::NdArray;

/// Map the requested placement to a concrete backend device.
#[cfg(feature = "accel")]
pub fn resolve_device(
    placement: DevicePlacement,
) -> Result<burn::backend::wgpu::WgpuDevice, PipelineError> {
    use burn::backend::wgpu::WgpuDevice;
    match placement {
        DevicePlacement::Host => Ok(WgpuDevice::Cpu),
        DevicePlacement::Accelerator(id) => Ok(WgpuDevice::DiscreteGpu(id)),
    }
}

/// Map the requested placement to a concrete backend device.
#[cfg(not(feature = "accel"))]
pub fn resolve_device(
    placement: DevicePlacement,
) -> Result<burn::backend::ndarray::NdArrayDevice, PipelineError> {
    use burn::backend::ndarray::NdArrayDevice;
    match placement {
        DevicePlacement::Host => Ok(NdArrayDevice::Cpu),
        DevicePlacement::Accelerator(id) => Err(PipelineError::config(format!(
            "accelerator {id} requested but this build has no accelerator \
             support (rebuild with --features accel)"
        ))),
    }
}
