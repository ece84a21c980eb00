pub mod wav;

mod wav_chunk;

pub use wav_chunk::WavChunkRecorder;
