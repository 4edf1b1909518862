//! Dictionary table types used by the conversion engine.
//!
//! Two table shapes exist:
//!
//! - [`PhraseTable`] — multi-character keys with per-starter length caps for
//!   fast longest-match probing during the phrase pass.
//! - [`CharTable`] — one scalar value to one scalar value, used by the
//!   character pass.
//!
//! Both are immutable once built and serializable with `serde` for the
//! CBOR/zstd dictionary snapshots.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Prints a developer note to stderr in debug builds; no-op in release.
///
/// Used for soft diagnostics while loading bundled dictionary assets
/// (skipped lines, key collisions). Never fails and never spams release
/// users.
#[macro_export]
macro_rules! debug_note {
    ($($arg:tt)*) => {
        #[allow(unused)]
        {
            if cfg!(debug_assertions) {
                eprintln!($($arg)*);
            }
        }
    };
}

/// A phrase dictionary with tracked length metadata, optimized for
/// longest-match scanning.
///
/// Keys are stored as `Box<[char]>` so the engine can look up a borrowed
/// `&[char]` window of the input without allocating per probe. `starter_cap`
/// records the longest key starting with a given character, which bounds the
/// probe loop at each scan position.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PhraseTable {
    /// Phrase (as boxed slice of `char`) → replacement string.
    pub map: FxHashMap<Box<[char]>, Box<str>>,

    /// Longest key length in characters across the table.
    pub max_len: usize,

    /// Shortest key length in characters across the table (0 when empty).
    pub min_len: usize,

    /// Longest key length per starting character.
    pub starter_cap: FxHashMap<char, u8>,
}

impl PhraseTable {
    /// Builds a table from `(key, value)` pairs.
    ///
    /// Duplicate keys resolve **last-wins**: a later pair silently replaces
    /// an earlier one. This is the merge precedence contract for
    /// category-partitioned sources — later categories override earlier
    /// ones — so it is intentional, not an error. Conflicting overrides are
    /// noted on stderr in debug builds.
    pub fn build_from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let it = pairs.into_iter();
        let (lower, _) = it.size_hint();

        let mut map: FxHashMap<Box<[char]>, Box<str>> = FxHashMap::default();
        if lower > 0 {
            map.reserve(lower);
        }
        let mut starter_cap: FxHashMap<char, u8> = FxHashMap::default();

        let mut global_max = 0usize;
        let mut global_min = usize::MAX;

        for (k, v) in it {
            debug_assert!(!k.is_empty(), "phrase key must not be empty");
            debug_assert!(!v.is_empty(), "phrase value must not be empty");

            let chars: Box<[char]> = k.chars().collect::<Vec<_>>().into_boxed_slice();
            let len = chars.len();
            let len_u8 = u8::try_from(len).unwrap_or(u8::MAX);

            if let Some(&c0) = chars.first() {
                starter_cap
                    .entry(c0)
                    .and_modify(|m| *m = (*m).max(len_u8))
                    .or_insert(len_u8);
            }

            global_max = global_max.max(len);
            global_min = global_min.min(len);

            if let Some(prev) = map.insert(chars, v.clone().into_boxed_str()) {
                if prev.as_ref() != v.as_str() {
                    debug_note!(
                        "duplicate key overridden (last-wins): key={:?}; dropped={:?}, kept={:?}",
                        k,
                        prev,
                        v
                    );
                }
            }
        }

        let min_len = if global_min == usize::MAX { 0 } else { global_min };

        Self {
            map,
            max_len: global_max,
            min_len,
            starter_cap,
        }
    }

    /// Longest key length starting with `c`, or 0 when no key starts with it.
    #[inline]
    pub fn starter_cap(&self, c: char) -> usize {
        self.starter_cap.get(&c).copied().unwrap_or(0) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// A context-free, one-to-one character substitution table.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CharTable {
    pub map: FxHashMap<char, char>,
}

impl CharTable {
    /// Builds a table from `(char, char)` pairs, last-wins on duplicates.
    pub fn build_from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let mut map = FxHashMap::default();
        for (k, v) in pairs {
            if let Some(prev) = map.insert(k, v) {
                if prev != v {
                    debug_note!(
                        "duplicate character mapping overridden: {:?} -> {:?} (was {:?})",
                        k,
                        v,
                        prev
                    );
                }
            }
        }
        Self { map }
    }

    /// Mapped counterpart of `c`, or `c` itself when no mapping exists.
    #[inline]
    pub fn convert(&self, c: char) -> char {
        self.map.get(&c).copied().unwrap_or(c)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_table_tracks_length_metadata() {
        let table = PhraseTable::build_from_pairs(vec![
            ("理发".to_string(), "理髮".to_string()),
            ("千钧一发".to_string(), "千鈞一髮".to_string()),
            ("“".to_string(), "「".to_string()),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.max_len, 4);
        assert_eq!(table.min_len, 1);
        assert_eq!(table.starter_cap('理'), 2);
        assert_eq!(table.starter_cap('千'), 4);
        assert_eq!(table.starter_cap('发'), 0);
    }

    #[test]
    fn phrase_table_duplicate_keys_last_wins() {
        let table = PhraseTable::build_from_pairs(vec![
            ("干线".to_string(), "乾線".to_string()),
            ("干线".to_string(), "幹線".to_string()),
        ]);

        let key: Box<[char]> = Box::from(['干', '线']);
        assert_eq!(table.map.get(&key).map(AsRef::as_ref), Some("幹線"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn phrase_table_empty_input_has_zero_bounds() {
        let table = PhraseTable::build_from_pairs(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.max_len, 0);
        assert_eq!(table.min_len, 0);
    }

    #[test]
    fn char_table_maps_or_passes_through() {
        let table = CharTable::build_from_pairs(vec![('发', '發'), ('头', '頭')]);
        assert_eq!(table.convert('发'), '發');
        assert_eq!(table.convert('A'), 'A');
        assert_eq!(table.convert('𬴂'), '𬴂');
    }
}
