pub mod decode;
pub mod encode;
pub mod wire;

pub use decode::{decode, verify};
pub use encode::encode;
pub use wire::{pack, unpack, MAGIC};

use rvc_core::{CanvasError, CanvasProfile};

/// Encodes `payload` straight to a serialized container.
pub fn encode_to_vec(payload: &[u8], profile: CanvasProfile) -> Result<Vec<u8>, CanvasError> {
    let canvas = encode(payload, profile)?;
    Ok(pack(&canvas))
}

/// Decodes a serialized container back to the original bytes.
pub fn decode_from_slice(raw: &[u8]) -> Result<Vec<u8>, CanvasError> {
    decode(unpack(raw)?)
}
