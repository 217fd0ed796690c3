use crate::core::interfaces::ContentHasher;

/// blake3 hex digest, truncated to the configured file name hash length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn hash(&self, content: &str, length: usize) -> String {
        let hex = blake3::hash(content.as_bytes()).to_hex();
        let length = length.min(hex.len());
        hex[..length].to_string()
    }
}
