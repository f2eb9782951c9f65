//! Hexonet plain-text response parsing
//!
//! The API answers every command with a block like:
//!
//! ```text
//! [RESPONSE]
//! code = 200
//! description = Command completed successfully
//! runtime = 0.044
//! queuetime = 0
//! property[rr][0] = example.com. 3600 IN NS ns1.ispapi.net.
//! property[rr][1] = example.com. 3600 IN A 192.0.2.1
//! EOF
//! ```
//!
//! Property columns are matched case-insensitively.

use std::collections::HashMap;
use zonesync_core::command::Response;
use zonesync_core::{Error, Result};

/// Column holding line records in list responses
const RR_COLUMN: &str = "RR";

/// Column holding the session id in a StartSession response
const SESSION_COLUMN: &str = "SESSION";

/// Parse a raw response body
///
/// # Errors
///
/// [`Error::Transport`] if the body carries no numeric `code`.
pub fn parse_response(body: &str) -> Result<Response> {
    let mut code: Option<u32> = None;
    let mut description = String::new();
    let mut columns: HashMap<String, Vec<(usize, String)>> = HashMap::new();

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case("code") {
            code = Some(value.parse().map_err(|_| {
                Error::transport(format!("Invalid response code: {value:?}"))
            })?);
        } else if key.eq_ignore_ascii_case("description") {
            description = value.to_string();
        } else if let Some((column, index)) = parse_property_key(key) {
            columns
                .entry(column.to_uppercase())
                .or_default()
                .push((index, value.to_string()));
        }
    }

    let code = code.ok_or_else(|| Error::transport("Response without a code"))?;

    let mut column = |name: &str| {
        let mut values = columns.remove(name).unwrap_or_default();
        values.sort_by_key(|(index, _)| *index);
        values.into_iter().map(|(_, value)| value).collect::<Vec<_>>()
    };

    let records = column(RR_COLUMN);
    let session_id = column(SESSION_COLUMN).into_iter().next();

    Ok(Response {
        code,
        description,
        records,
        session_id,
    })
}

/// Copy of `body` with session ids masked, for the traffic sink
pub(crate) fn redact_session(body: &str) -> String {
    body.lines()
        .map(|line| match line.split_once('=') {
            Some((key, _))
                if parse_property_key(key.trim())
                    .is_some_and(|(column, _)| column.eq_ignore_ascii_case(SESSION_COLUMN)) =>
            {
                format!("{} = ***", key.trim())
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split `property[COLUMN][INDEX]` into its parts
fn parse_property_key(key: &str) -> Option<(&str, usize)> {
    let rest = key
        .strip_prefix("property[")
        .or_else(|| key.strip_prefix("PROPERTY["))?;
    let (column, rest) = rest.split_once("][")?;
    let index = rest.strip_suffix(']')?.parse().ok()?;
    Some((column, index))
}
