pub mod recorder;
pub mod playback;

pub use recorder::MediaRecorderAdapter;
pub use playback::WebAudioOutput;
