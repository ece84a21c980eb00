//! Application layer: use cases and ports

pub mod acquirer;
pub mod engine;
pub mod inventory;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;
pub mod surface;

pub use acquirer::StreamAcquirer;
pub use engine::{EngineError, EngineEvent, RecordingEngine, StopReason};
pub use inventory::{DeviceInventory, DeviceListing, InventoryError};
pub use orchestrator::{OrchestratorError, PitchRecorder, RecorderEvent, RecorderPhase};
pub use pipeline::{
    AnalyzeCallbacks, AnalyzeInput, AnalyzePitchUseCase, PipelineError, PitchAnalysis,
};
pub use surface::{BlobUrlRegistry, SurfaceController};
