//! Embeddings are stored as base64 of their little-endian `f32` bytes, so a
//! reload reproduces every value bit for bit.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const F32_BYTES: usize = std::mem::size_of::<f32>();

pub(crate) fn encode_embedding(embedding: &[f32]) -> String {
    let bytes: Vec<u8> = embedding.iter().flat_map(|v| v.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

pub(crate) fn decode_embedding(encoded: &str) -> Result<Vec<f32>, String> {
    let bytes = STANDARD.decode(encoded).map_err(|e| e.to_string())?;
    if bytes.len() % F32_BYTES != 0 {
        return Err(format!(
            "{} bytes is not a whole number of f32 values",
            bytes.len()
        ));
    }
    Ok(bytes
        .chunks_exact(F32_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_survive_bit_for_bit() {
        let values = vec![0.1, -0.0, f32::MIN_POSITIVE, 1.0e-40, f32::MAX, 0.333_333_34];
        let decoded = decode_embedding(&encode_embedding(&values)).unwrap();

        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&decoded), bits(&values));
    }

    #[test]
    fn test_empty_embedding() {
        assert_eq!(encode_embedding(&[]), "");
        assert_eq!(decode_embedding("").unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_rejects_truncated_bytes() {
        let truncated = STANDARD.encode([0u8, 0, 128]);
        assert!(decode_embedding(&truncated).is_err());
        assert!(decode_embedding("not base64!").is_err());
    }
}
