mod generate;
mod upload;
mod wav_extractor;

pub use generate::DocumentClient;
pub use upload::{UploadClient, MAX_UPLOAD_BYTES};
pub use wav_extractor::WavAudioExtractor;
