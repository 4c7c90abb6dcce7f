pub mod message;
pub mod profile;
pub mod thread;
pub mod event;
pub mod config;
pub mod error;


pub use error::LensError;
pub type Result<T> = std::result::Result<T, LensError>;
