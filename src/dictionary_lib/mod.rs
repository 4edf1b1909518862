//! Loading and aggregation of the bundled TongWen dictionaries.
//!
//! The bundled data is category-partitioned: each category ships one word
//! table per direction (the reverse `unit` table does not exist upstream and
//! is deliberately not invented here), plus one character table per
//! direction. [`TongWenDictionary`] merges the word tables in the fixed
//! category order, later categories overriding earlier ones on key
//! collision.
//!
//! Users generally interact with this indirectly via the `TongWen` engine,
//! but the types are public for custom loading and snapshot tooling.

use std::error::Error as StdError;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use zstd::{Decoder, Encoder};

use crate::debug_note;
use crate::Direction;

pub mod tables;

pub use tables::{CharTable, PhraseTable};

/// Word-dictionary categories, in merge order.
///
/// The order is a precedence policy: when two categories define the same
/// key, the later category wins. Reordering this list changes conversion
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Entertainment,
    General,
    It,
    Person,
    Place,
    Punctuation,
    Science,
    Unit,
}

impl Category {
    /// All categories in merge order.
    pub const MERGE_ORDER: [Category; 8] = [
        Category::Entertainment,
        Category::General,
        Category::It,
        Category::Person,
        Category::Place,
        Category::Punctuation,
        Category::Science,
        Category::Unit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::It => "it",
            Category::Person => "person",
            Category::Place => "place",
            Category::Punctuation => "punctuation",
            Category::Science => "science",
            Category::Unit => "unit",
        }
    }
}

/// Bundled word tables for simplified → traditional, in merge order.
const S2T_WORD_SOURCES: &[(Category, &str)] = &[
    (
        Category::Entertainment,
        include_str!("dicts/entertainment.s2t.txt"),
    ),
    (Category::General, include_str!("dicts/general.s2t.txt")),
    (Category::It, include_str!("dicts/it.s2t.txt")),
    (Category::Person, include_str!("dicts/person.s2t.txt")),
    (Category::Place, include_str!("dicts/place.s2t.txt")),
    (
        Category::Punctuation,
        include_str!("dicts/punctuation.s2t.txt"),
    ),
    (Category::Science, include_str!("dicts/science.s2t.txt")),
    (Category::Unit, include_str!("dicts/unit.s2t.txt")),
];

/// Bundled word tables for traditional → simplified, in merge order.
///
/// No `unit` table exists for this direction; absence means no override,
/// matching the upstream data set.
const T2S_WORD_SOURCES: &[(Category, &str)] = &[
    (
        Category::Entertainment,
        include_str!("dicts/entertainment.t2s.txt"),
    ),
    (Category::General, include_str!("dicts/general.t2s.txt")),
    (Category::It, include_str!("dicts/it.t2s.txt")),
    (Category::Person, include_str!("dicts/person.t2s.txt")),
    (Category::Place, include_str!("dicts/place.t2s.txt")),
    (
        Category::Punctuation,
        include_str!("dicts/punctuation.t2s.txt"),
    ),
    (Category::Science, include_str!("dicts/science.t2s.txt")),
];

const S2T_CHARACTERS: &str = include_str!("dicts/s2t-characters.txt");
const T2S_CHARACTERS: &str = include_str!("dicts/t2s-characters.txt");

/// The full dictionary state for both directions: one merged phrase table
/// and one character table per direction. Immutable after construction.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TongWenDictionary {
    pub s2t_phrases: PhraseTable,
    pub s2t_characters: CharTable,
    pub t2s_phrases: PhraseTable,
    pub t2s_characters: CharTable,
}

impl TongWenDictionary {
    /// Builds the dictionary from the bundled plaintext assets.
    ///
    /// Malformed lines are skipped (with a stderr note in debug builds); an
    /// asset that yields no usable entries at all is treated as corrupt and
    /// fails the whole load.
    pub fn new() -> Result<Self, DictionaryError> {
        let s2t_phrases = Self::merge_word_sources(S2T_WORD_SOURCES)?;
        let t2s_phrases = Self::merge_word_sources(T2S_WORD_SOURCES)?;
        let s2t_characters = Self::load_char_table(S2T_CHARACTERS, "s2t-characters")?;
        let t2s_characters = Self::load_char_table(T2S_CHARACTERS, "t2s-characters")?;

        Ok(TongWenDictionary {
            s2t_phrases,
            s2t_characters,
            t2s_phrases,
            t2s_characters,
        })
    }

    /// The `(phrase table, character table)` pair for one direction.
    #[inline]
    pub fn pair(&self, direction: Direction) -> (&PhraseTable, &CharTable) {
        match direction {
            Direction::S2t => (&self.s2t_phrases, &self.s2t_characters),
            Direction::T2s => (&self.t2s_phrases, &self.t2s_characters),
        }
    }

    /// Merges category word tables into one flat phrase table.
    ///
    /// Sources are consumed in slice order; [`PhraseTable::build_from_pairs`]
    /// resolves key collisions last-wins, so the later category's entry
    /// survives.
    fn merge_word_sources(sources: &[(Category, &str)]) -> Result<PhraseTable, DictionaryError> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (category, content) in sources {
            let parsed = Self::parse_word_pairs(content, category.name());
            if parsed.is_empty() {
                return Err(DictionaryError::ParseError(format!(
                    "word table {:?} contains no usable entries",
                    category.name()
                )));
            }
            pairs.extend(parsed);
        }
        Ok(PhraseTable::build_from_pairs(pairs))
    }

    /// Parses `key<TAB>value` lines, skipping anything malformed.
    fn parse_word_pairs(content: &str, source: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for line in content.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => pairs.push((key.to_string(), value.to_string())),
                _ => {
                    debug_note!("[{}] invalid line skipped: {}", source, line);
                }
            }
        }
        pairs
    }

    /// Parses a character table; both sides of each entry must be exactly
    /// one Unicode scalar value.
    fn load_char_table(content: &str, source: &str) -> Result<CharTable, DictionaryError> {
        let mut pairs: Vec<(char, char)> = Vec::new();
        for line in content.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (key, value) = match (parts.next(), parts.next()) {
                (Some(k), Some(v)) => (k, v),
                _ => {
                    debug_note!("[{}] invalid line skipped: {}", source, line);
                    continue;
                }
            };
            match (single_char(key), single_char(value)) {
                (Some(k), Some(v)) => pairs.push((k, v)),
                _ => {
                    debug_note!(
                        "[{}] entry is not a single-character mapping, skipped: {}",
                        source,
                        line
                    );
                }
            }
        }

        if pairs.is_empty() {
            return Err(DictionaryError::ParseError(format!(
                "character table {:?} contains no usable entries",
                source
            )));
        }
        Ok(CharTable::build_from_pairs(pairs))
    }

    /// Serializes the dictionary to a CBOR file.
    pub fn serialize_to_cbor<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryError> {
        let cbor_data = serde_cbor::to_vec(self).map_err(|err| {
            DictionaryError::ParseError(format!("failed to serialize CBOR: {}", err))
        })?;
        std::fs::write(&path, cbor_data)
            .map_err(|err| DictionaryError::IoError(format!("failed to write CBOR file: {}", err)))
    }

    /// Deserializes a dictionary from a CBOR file.
    pub fn deserialize_from_cbor<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let cbor_data = std::fs::read(&path)
            .map_err(|err| DictionaryError::IoError(format!("failed to read CBOR file: {}", err)))?;
        serde_cbor::from_slice(&cbor_data)
            .map_err(|err| DictionaryError::ParseError(format!("failed to parse CBOR: {}", err)))
    }

    /// Saves the dictionary as zstd-compressed CBOR.
    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryError> {
        let file = File::create(path).map_err(|e| DictionaryError::IoError(e.to_string()))?;
        let writer = BufWriter::new(file);
        let mut encoder =
            Encoder::new(writer, 3).map_err(|e| DictionaryError::IoError(e.to_string()))?;
        serde_cbor::to_writer(&mut encoder, self)
            .map_err(|e| DictionaryError::ParseError(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| DictionaryError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Loads a dictionary from zstd-compressed CBOR.
    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let file = File::open(path).map_err(|e| DictionaryError::IoError(e.to_string()))?;
        let reader = BufReader::new(file);
        let mut decoder =
            Decoder::new(reader).map_err(|e| DictionaryError::IoError(e.to_string()))?;
        serde_cbor::from_reader(&mut decoder).map_err(|e| DictionaryError::ParseError(e.to_string()))
    }
}

#[inline]
fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Errors raised while loading or parsing dictionary data.
///
/// `Clone` so the shared engine initializer can cache the first failure and
/// report it to every later caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    IoError(String),
    ParseError(String),
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryError::IoError(msg) => write!(f, "I/O Error: {}", msg),
            DictionaryError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
        }
    }
}

impl StdError for DictionaryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dictionary_loads() {
        let dictionary = TongWenDictionary::new().unwrap();
        assert!(!dictionary.s2t_phrases.is_empty());
        assert!(!dictionary.s2t_characters.is_empty());
        assert!(!dictionary.t2s_phrases.is_empty());
        assert!(!dictionary.t2s_characters.is_empty());
        // Longest bundled s2t phrase key spans at least 4 characters (千钧一发).
        assert!(dictionary.s2t_phrases.max_len >= 4);
    }

    #[test]
    fn merge_later_category_wins() {
        let sources: &[(Category, &str)] = &[
            (Category::General, "开关\t開關一\n理发\t理髮\n"),
            (Category::It, "开关\t開關二\n"),
        ];
        let merged = TongWenDictionary::merge_word_sources(sources).unwrap();

        let key: Box<[char]> = Box::from(['开', '关']);
        assert_eq!(merged.map.get(&key).map(AsRef::as_ref), Some("開關二"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_order_is_fixed() {
        let names: Vec<&str> = Category::MERGE_ORDER.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            [
                "entertainment",
                "general",
                "it",
                "person",
                "place",
                "punctuation",
                "science",
                "unit"
            ]
        );
        // The t2s direction deliberately has no unit table.
        assert_eq!(S2T_WORD_SOURCES.len(), 8);
        assert_eq!(T2S_WORD_SOURCES.len(), 7);
        assert!(T2S_WORD_SOURCES.iter().all(|(c, _)| *c != Category::Unit));
    }

    #[test]
    fn malformed_word_lines_are_skipped() {
        let pairs =
            TongWenDictionary::parse_word_pairs("理发\t理髮\nlonely-key\n\n头发\t頭髮\n", "test");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("理发".to_string(), "理髮".to_string()));
        assert_eq!(pairs[1], ("头发".to_string(), "頭髮".to_string()));
    }

    #[test]
    fn char_table_rejects_multi_char_entries() {
        let table =
            TongWenDictionary::load_char_table("发\t發\n理发\t理髮\n头\t頭\n", "test").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.convert('发'), '發');
    }

    #[test]
    fn empty_char_table_is_a_load_error() {
        let err = TongWenDictionary::load_char_table("# only a comment\n", "test").unwrap_err();
        assert!(matches!(err, DictionaryError::ParseError(_)));
    }
}
