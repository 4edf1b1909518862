//! TongWen-style Chinese script conversion (simplified ↔ traditional).
//!
//! The engine applies two passes over the input:
//!
//! 1. **Phrase pass** — longest-match substitution against the merged
//!    per-direction phrase table. At each scan position the longest matching
//!    key wins and consumes its full span; unmatched characters pass through.
//! 2. **Character pass** — scalar-value by scalar-value substitution against
//!    the per-direction character table; unmapped characters pass through.
//!
//! Conversion never fails on content — only dictionary initialization can
//! error, and that error is sticky for the process lifetime when using the
//! shared instance.
//!
//! ```
//! use tongwen_conv::{Direction, TongWen};
//!
//! let tongwen = TongWen::new().unwrap();
//! assert_eq!(tongwen.convert("头发", Direction::S2t), "頭髮");
//! assert_eq!(tongwen.convert("千钧一发", Direction::S2t), "千鈞一髮");
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;

use crate::dictionary_lib::{CharTable, DictionaryError, PhraseTable, TongWenDictionary};

pub mod dictionary_lib;

/// Conversion direction. Exactly two variants; anything else is a caller
/// error and fails fast at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Simplified → traditional.
    S2t,
    /// Traditional → simplified.
    T2s,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::S2t => "s2t",
            Direction::T2s => "t2s",
        }
    }
}

impl FromStr for Direction {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s2t" => Ok(Direction::S2t),
            "t2s" => Ok(Direction::T2s),
            other => Err(ConvertError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the conversion entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Dictionary assets failed to load; fatal for this process lifetime.
    Initialization(DictionaryError),
    /// The caller passed a direction spelling outside `"s2t"` / `"t2s"`.
    InvalidDirection(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Initialization(err) => {
                write!(f, "dictionary initialization failed: {}", err)
            }
            ConvertError::InvalidDirection(s) => {
                write!(f, "invalid direction {:?} (expected \"s2t\" or \"t2s\")", s)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Initialization(err) => Some(err),
            ConvertError::InvalidDirection(_) => None,
        }
    }
}

impl From<DictionaryError> for ConvertError {
    fn from(err: DictionaryError) -> Self {
        ConvertError::Initialization(err)
    }
}

/// The conversion engine: owns both per-direction dictionary pairs.
///
/// Construction loads and merges all bundled tables; the instance is
/// immutable afterwards and safe to share across threads.
pub struct TongWen {
    pub dictionary: TongWenDictionary,
}

impl TongWen {
    /// Builds an engine from the bundled dictionary assets.
    pub fn new() -> Result<Self, DictionaryError> {
        Ok(Self::from_dictionary(TongWenDictionary::new()?))
    }

    /// Builds an engine from an already-loaded dictionary (e.g. a snapshot
    /// restored via [`TongWenDictionary::load_compressed`]).
    pub fn from_dictionary(dictionary: TongWenDictionary) -> Self {
        TongWen { dictionary }
    }

    /// Converts `text` in the given direction: phrase pass, then character
    /// pass. Pure: identical inputs always yield identical output.
    pub fn convert(&self, text: &str, direction: Direction) -> String {
        if text.is_empty() {
            return String::new();
        }
        let (phrases, characters) = self.dictionary.pair(direction);
        let intermediate = Self::replace_phrases(text, phrases);
        Self::replace_characters(&intermediate, characters)
    }

    /// Simplified → traditional.
    pub fn s2t(&self, text: &str) -> String {
        self.convert(text, Direction::S2t)
    }

    /// Traditional → simplified.
    pub fn t2s(&self, text: &str) -> String {
        self.convert(text, Direction::T2s)
    }

    /// Phrase pass: left-to-right longest-match substitution.
    ///
    /// At each position the probe is bounded by the per-starter cap (and the
    /// remaining input), descending to the table's minimum key length. A
    /// match consumes its full span; scanning resumes after it. Matched
    /// spans never overlap.
    fn replace_phrases(text: &str, phrases: &PhraseTable) -> String {
        if phrases.is_empty() {
            return text.to_string();
        }

        let text_chars: Vec<char> = text.chars().collect();
        let text_length = text_chars.len();
        let mut result = String::with_capacity(text.len());

        let mut start_pos = 0;
        while start_pos < text_length {
            let remaining = text_length - start_pos;
            let cap = phrases.starter_cap(text_chars[start_pos]).min(remaining);

            let mut matched_length = 0;
            if cap >= phrases.min_len {
                for length in (phrases.min_len..=cap).rev() {
                    let candidate = &text_chars[start_pos..start_pos + length];
                    if let Some(value) = phrases.map.get(candidate) {
                        result.push_str(value);
                        matched_length = length;
                        break;
                    }
                }
            }

            if matched_length == 0 {
                // No phrase starts here; the character pass picks it up.
                result.push(text_chars[start_pos]);
                matched_length = 1;
            }
            start_pos += matched_length;
        }
        result
    }

    /// Character pass: per-scalar-value substitution with passthrough.
    fn replace_characters(text: &str, characters: &CharTable) -> String {
        text.chars().map(|c| characters.convert(c)).collect()
    }
}

/// The process-wide shared engine, built at most once. A failed build is
/// cached and returned to every later caller; corrupt bundled assets will
/// not fix themselves, so there is no retry.
static SHARED: OnceCell<Result<TongWen, DictionaryError>> = OnceCell::new();

/// The lazily-initialized shared engine instance.
///
/// The first caller (or the winner among concurrent first callers) performs
/// the one-time dictionary load; everyone else blocks on that same load and
/// observes either the fully-built engine or its error — never a partially
/// populated state.
pub fn shared() -> Result<&'static TongWen, DictionaryError> {
    SHARED
        .get_or_init(TongWen::new)
        .as_ref()
        .map_err(Clone::clone)
}

/// Converts `text` using the shared engine, initializing it on first use.
pub fn convert(text: &str, direction: Direction) -> Result<String, ConvertError> {
    Ok(shared()?.convert(text, direction))
}
