pub mod decode;
pub mod encode;

pub use decode::{DecodeFailure, QrDecoder};
pub use encode::{encode_link, QrStyle};
