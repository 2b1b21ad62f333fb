use anyhow::{Context, Result};

use crate::models::SongRecord;

/// Serialize the whole library as a JSON array, preserving order.
pub fn encode(songs: &[SongRecord]) -> Result<String> {
    serde_json::to_string(songs).context("failed to serialize song library")
}

/// Parse a blob produced by [`encode`]. Blobs written before records carried
/// an id decode with unassigned ids.
pub fn decode(blob: &str) -> Result<Vec<SongRecord>> {
    serde_json::from_str(blob).context("failed to parse stored song library")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SongId;

    #[test]
    fn round_trip_preserves_content_and_order() {
        let songs = vec![
            SongRecord::new(SongId(2), "Xray", "/tmp/Xray.onsong", "Title: Xray\n[C]la"),
            SongRecord::new(SongId(1), "abc", "file:///abc", ""),
            SongRecord::new(SongId(3), "ñandú \"quoted\"", "", "line1\r\nline2\t"),
        ];

        let decoded = decode(&encode(&songs).unwrap()).unwrap();

        assert_eq!(decoded, songs);
    }

    #[test]
    fn decodes_blobs_without_ids() {
        let blob = r#"[{"name":"X","uri":"file:///X","content":"abc"}]"#;

        let decoded = decode(blob).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "X");
        assert_eq!(decoded[0].uri, "file:///X");
        assert_eq!(decoded[0].content, "abc");
        assert!(decoded[0].id.is_unassigned());
    }

    #[test]
    fn encoded_records_carry_the_three_named_fields() {
        let blob = encode(&[SongRecord::new(SongId(1), "X", "u", "c")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        let record = &value.as_array().unwrap()[0];
        assert_eq!(record["name"], "X");
        assert_eq!(record["uri"], "u");
        assert_eq!(record["content"], "c");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode("{not json").is_err());
        assert!(decode(r#"{"name":"not a list"}"#).is_err());
    }
}
