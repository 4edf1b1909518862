#[cfg(test)]
mod tests {
    use tongwen_conv::dictionary_lib::TongWenDictionary;
    use tongwen_conv::{Direction, TongWen};

    fn table_stats(d: &TongWenDictionary) -> [(usize, usize, usize); 2] {
        [
            (
                d.s2t_phrases.len(),
                d.s2t_phrases.min_len,
                d.s2t_phrases.max_len,
            ),
            (
                d.t2s_phrases.len(),
                d.t2s_phrases.min_len,
                d.t2s_phrases.max_len,
            ),
        ]
    }

    #[test]
    fn cbor_snapshot_round_trip() {
        let dictionary = TongWenDictionary::new().unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();

        dictionary.serialize_to_cbor(file.path()).unwrap();
        let restored = TongWenDictionary::deserialize_from_cbor(file.path()).unwrap();

        assert_eq!(table_stats(&dictionary), table_stats(&restored));
        assert_eq!(
            dictionary.s2t_characters.len(),
            restored.s2t_characters.len()
        );
        assert_eq!(
            dictionary.t2s_characters.len(),
            restored.t2s_characters.len()
        );
    }

    #[test]
    fn compressed_snapshot_round_trip_preserves_conversion() {
        let dictionary = TongWenDictionary::new().unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();

        dictionary.save_compressed(file.path()).unwrap();
        let restored = TongWenDictionary::load_compressed(file.path()).unwrap();

        assert_eq!(table_stats(&dictionary), table_stats(&restored));

        let tongwen = TongWen::from_dictionary(restored);
        assert_eq!(tongwen.convert("头发理发", Direction::S2t), "頭髮理髮");
        assert_eq!(tongwen.convert("頭髮", Direction::T2s), "头发");
    }

    #[test]
    fn loading_a_missing_snapshot_is_an_io_error() {
        use tongwen_conv::dictionary_lib::DictionaryError;

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-snapshot.zstd");
        let err = TongWenDictionary::load_compressed(&missing).unwrap_err();
        assert!(matches!(err, DictionaryError::IoError(_)));
    }

    #[test]
    fn corrupt_snapshot_is_a_parse_error() {
        use std::io::Write;
        use tongwen_conv::dictionary_lib::DictionaryError;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not cbor").unwrap();
        let err = TongWenDictionary::deserialize_from_cbor(file.path()).unwrap_err();
        assert!(matches!(err, DictionaryError::ParseError(_)));
    }
}
