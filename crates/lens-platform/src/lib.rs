//! Browser adapters for the Future Lens ports: Gemini over fetch,
//! localStorage persistence, MediaRecorder capture, Web Audio playback.

pub mod llm;
pub mod storage;
pub mod audio;
pub mod download;
