pub mod decoder;
pub mod error;
pub mod flooder;
pub mod interop;
pub mod matcher;
pub mod types;
pub mod util;

pub use decoder::{DecodeResult, Decoder};
pub use error::MwpmError;
