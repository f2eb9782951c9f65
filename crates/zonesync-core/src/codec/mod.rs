//! Line record codec
//!
//! Converts between [`Record`] and the provider's single-line notation:
//!
//! ```text
//! <name> <ttl> IN <type> <value>
//! gomeing.com. 3600 IN NS ns1191.hexonet.net.
//! ```
//!
//! Decoding follows one fixed grammar; encoding delegates TXT values to a
//! pluggable [`TxtSanitizer`].

pub mod txt;

pub use txt::{QuotedSegments, TxtSanitizer, Verbatim};

use crate::error::{Error, Result};
use crate::record::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+\.)\s+(\d+)\s+IN\s+(\w+)\s+(.+)$").expect("line record pattern is valid")
});

/// How to treat a TTL field that is all digits but does not fit in `u32`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlParsing {
    /// Reject the line with [`Error::InvalidTtl`]
    #[default]
    Strict,
    /// Accept the line and use a TTL of 0
    Lenient,
}

/// Encoder/decoder for line records
#[derive(Debug, Clone)]
pub struct LineCodec {
    txt: Arc<dyn TxtSanitizer>,
    ttl_parsing: TtlParsing,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with quoted-segment TXT handling and strict TTLs
    pub fn new() -> Self {
        Self {
            txt: Arc::new(QuotedSegments),
            ttl_parsing: TtlParsing::default(),
        }
    }

    /// Replace the TXT sanitize strategy
    pub fn with_txt_sanitizer(mut self, txt: Arc<dyn TxtSanitizer>) -> Self {
        self.txt = txt;
        self
    }

    /// Set the TTL parsing policy
    pub fn with_ttl_parsing(mut self, ttl_parsing: TtlParsing) -> Self {
        self.ttl_parsing = ttl_parsing;
        self
    }

    /// The active TTL parsing policy
    pub fn ttl_parsing(&self) -> TtlParsing {
        self.ttl_parsing
    }

    /// Decode one line record
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedRecordLine`] if the line does not match the grammar
    /// - [`Error::InvalidTtl`] if the TTL overflows and the policy is strict
    pub fn parse_line(&self, line: &str) -> Result<Record> {
        let caps = LINE_PATTERN
            .captures(line)
            .ok_or_else(|| Error::malformed(line))?;

        let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
        let ttl_field = field(2);

        let ttl = match (ttl_field.parse::<u32>(), self.ttl_parsing) {
            (Ok(ttl), _) => ttl,
            (Err(_), TtlParsing::Lenient) => {
                tracing::warn!("TTL {} out of range, using 0: {}", ttl_field, line);
                0
            }
            (Err(_), TtlParsing::Strict) => {
                return Err(Error::InvalidTtl {
                    line: line.to_string(),
                    ttl: ttl_field.to_string(),
                });
            }
        };

        Ok(Record {
            name: field(1).to_string(),
            record_type: field(3).to_string(),
            value: field(4).to_string(),
            ttl,
        })
    }

    /// Encode one record as a line record
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the name, type or encoded value contains a
    /// line break. Line records travel one per line, so a break would split
    /// the record and inject whatever follows it into the command.
    pub fn format_line(&self, record: &Record) -> Result<String> {
        let value = self.wire_value(record);
        for (field, text) in [
            ("name", record.name.as_str()),
            ("type", record.record_type.as_str()),
            ("value", value.as_str()),
        ] {
            if text.contains(['\n', '\r']) {
                return Err(Error::invalid_input(format!(
                    "Line break in record {field}: {text:?}"
                )));
            }
        }

        Ok(format!(
            "{} {} IN {} {}",
            record.name, record.ttl, record.record_type, value
        ))
    }

    fn wire_value(&self, record: &Record) -> String {
        if record.is_txt() {
            self.txt.sanitize(&record.value)
        } else {
            record.value.clone()
        }
    }
}
