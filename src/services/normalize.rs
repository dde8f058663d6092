/// Normalization of heterogeneous raw records into canonical places
///
/// The conversions themselves live on the model types; this module is the
/// pipeline entry point that absorbs per-record failures. A malformed record
/// never fails a request: it is dropped and counted.
use crate::models::{Place, RawRecord};

/// Converts one raw record from either source into a canonical place
pub fn normalize(record: RawRecord) -> crate::error::AppResult<Place> {
    match record {
        RawRecord::Online(raw) => Place::try_from(raw),
        RawRecord::Offline(row) => Place::try_from(row),
    }
}

/// Normalizes a batch, dropping and counting malformed records
pub fn normalize_all(records: Vec<RawRecord>) -> Vec<Place> {
    let total = records.len();
    let mut dropped = 0usize;

    let places: Vec<Place> = records
        .into_iter()
        .filter_map(|record| match normalize(record) {
            Ok(place) => Some(place),
            Err(e) => {
                dropped += 1;
                tracing::debug!(error = %e, "Dropping malformed record");
                None
            }
        })
        .collect();

    if dropped > 0 {
        tracing::warn!(dropped, total, "Dropped malformed records during normalization");
    }

    places
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogRow, FsqPlace, Source};

    fn online_record(json: &str) -> RawRecord {
        RawRecord::Online(serde_json::from_str::<FsqPlace>(json).unwrap())
    }

    #[test]
    fn test_normalize_dispatches_by_source() {
        let online = online_record(
            r#"{"fsq_id": "a", "name": "A", "geocodes": {"main": {"latitude": 18.5, "longitude": 73.8}}}"#,
        );
        let offline = RawRecord::Offline(CatalogRow {
            id: Some("b".to_string()),
            name: Some("B".to_string()),
            lat: Some(18.51),
            lon: Some(73.81),
            popularity: None,
            price_tier: None,
            address: None,
            photo: None,
        });

        let a = normalize(online).unwrap();
        let b = normalize(offline).unwrap();
        assert_eq!(a.source, Source::Online);
        assert_eq!(b.source, Source::Offline);
    }

    #[test]
    fn test_normalize_all_drops_malformed_and_keeps_rest() {
        let records = vec![
            online_record(
                r#"{"fsq_id": "good", "name": "Good", "geocodes": {"main": {"latitude": 18.5, "longitude": 73.8}}}"#,
            ),
            online_record(r#"{"fsq_id": "bad", "name": "No Coordinates"}"#),
            online_record(
                r#"{"name": "No Id", "geocodes": {"main": {"latitude": 18.5, "longitude": 73.8}}}"#,
            ),
        ];

        let places = normalize_all(records);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "good");
    }

    #[test]
    fn test_normalize_all_empty_input() {
        assert!(normalize_all(vec![]).is_empty());
    }
}
