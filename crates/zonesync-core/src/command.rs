//! Typed provider commands and responses
//!
//! The provider speaks in string-keyed parameter bags. Inside the crate,
//! commands stay typed; [`Command::to_wire`] produces the string-keyed form
//! for transports at the very edge.

/// Command name for listing the records of a zone
pub const QUERY_ZONE_RR_LIST: &str = "QueryDNSZoneRRList";

/// Command name for adding/removing records of a zone
pub const UPDATE_ZONE: &str = "UpdateDNSZone";

/// List all line records of a zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Zone name
    pub zone: String,
}

/// Add and/or remove line records in one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutateRequest {
    /// Zone name
    pub zone: String,
    /// Encoded line records to add
    pub add: Vec<String>,
    /// Encoded line records to remove
    pub remove: Vec<String>,
}

impl MutateRequest {
    /// A request that only adds records
    pub fn add(zone: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            zone: zone.into(),
            add: lines,
            remove: Vec::new(),
        }
    }

    /// A request that only removes records
    pub fn remove(zone: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            zone: zone.into(),
            add: Vec::new(),
            remove: lines,
        }
    }
}

/// A command sent to the provider over an established session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `QueryDNSZoneRRList`
    List(ListRequest),
    /// `UpdateDNSZone`
    Mutate(MutateRequest),
}

impl Command {
    /// The provider's command name
    pub fn name(&self) -> &'static str {
        match self {
            Command::List(_) => QUERY_ZONE_RR_LIST,
            Command::Mutate(_) => UPDATE_ZONE,
        }
    }

    /// The zone this command targets
    pub fn zone(&self) -> &str {
        match self {
            Command::List(req) => &req.zone,
            Command::Mutate(req) => &req.zone,
        }
    }

    /// Flatten into ordered `(key, value)` parameters
    ///
    /// `COMMAND` comes first, then `dnszone`, then `delrr<i>` and `addrr<i>`
    /// entries indexed from 0 within each list.
    pub fn to_wire(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("COMMAND".to_string(), self.name().to_string()),
            ("dnszone".to_string(), self.zone().to_string()),
        ];

        if let Command::Mutate(req) = self {
            params.extend(
                req.remove
                    .iter()
                    .enumerate()
                    .map(|(i, line)| (format!("delrr{i}"), line.clone())),
            );
            params.extend(
                req.add
                    .iter()
                    .enumerate()
                    .map(|(i, line)| (format!("addrr{i}"), line.clone())),
            );
        }

        params
    }
}

/// A provider response, already split into its structured parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Provider response code (2xx means success)
    pub code: u32,
    /// Human-readable description
    pub description: String,
    /// Line records returned by list-style commands (the `RR` column)
    pub records: Vec<String>,
    /// Session identifier returned by a login
    pub session_id: Option<String>,
}

impl Response {
    /// A success response with no payload
    pub fn ok() -> Self {
        Self::new(200, "Command completed successfully")
    }

    /// A response with the given code and description
    pub fn new(code: u32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            ..Self::default()
        }
    }

    /// Attach line records
    pub fn with_records(mut self, records: Vec<String>) -> Self {
        self.records = records;
        self
    }

    /// Attach a session identifier
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Whether the provider accepted the command
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_list_to_wire() {
        let cmd = Command::List(ListRequest {
            zone: "acme.com".to_string(),
        });
        assert_eq!(
            pairs(&cmd.to_wire()),
            vec![("COMMAND", "QueryDNSZoneRRList"), ("dnszone", "acme.com")]
        );
    }

    #[test]
    fn test_mutate_to_wire_indexes_each_list() {
        let cmd = Command::Mutate(MutateRequest {
            zone: "acme.com".to_string(),
            add: vec!["a. 1 IN A 1.1.1.1".into(), "b. 1 IN A 2.2.2.2".into()],
            remove: vec!["c. 1 IN A 3.3.3.3".into()],
        });
        assert_eq!(
            pairs(&cmd.to_wire()),
            vec![
                ("COMMAND", "UpdateDNSZone"),
                ("dnszone", "acme.com"),
                ("delrr0", "c. 1 IN A 3.3.3.3"),
                ("addrr0", "a. 1 IN A 1.1.1.1"),
                ("addrr1", "b. 1 IN A 2.2.2.2"),
            ]
        );
    }

    #[test]
    fn test_success_range() {
        assert!(Response::ok().is_success());
        assert!(Response::new(219, "partial").is_success());
        assert!(!Response::new(545, "Entity reference not found").is_success());
        assert!(!Response::new(421, "Command failed due to server error").is_success());
    }
}
