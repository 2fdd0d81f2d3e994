//! Bulk record loading.

use std::path::Path;

use crate::card::RawCard;
use crate::error::LoadError;

/// Read and parse the full bulk dump at `path`.
///
/// Both failure modes are fatal to the batch — there is no partial load.
pub fn load_cards(path: &Path) -> Result<Vec<RawCard>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_record_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"oracle_id":"a","name":"Shock","type_line":"Instant","oracle_text":"Deal 2 damage."}}]"#
        )
        .unwrap();

        let cards = load_cards(file.path()).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Shock");
    }

    #[test]
    fn missing_file_is_source_read_error() {
        let err = load_cards(Path::new("/nonexistent/cards.json")).unwrap_err();
        assert!(matches!(err, LoadError::SourceRead { .. }));
    }

    #[test]
    fn malformed_payload_is_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"an array\"").unwrap();

        let err = load_cards(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}
