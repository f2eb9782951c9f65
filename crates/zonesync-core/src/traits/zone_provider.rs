// # Zone Provider Trait
//
// The caller-facing surface: four record operations per zone.
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{Record, ZoneProvider};
//
// let provider: Box<dyn ZoneProvider> = /* ZoneReconciler */;
//
// let desired = vec![Record::new("example.com.", "A", "192.0.2.1", 300)];
// provider.set_records("example.com", &desired).await?;
// ```

use async_trait::async_trait;

use crate::error::Result;
use crate::record::Record;

/// Trait for zone record management
///
/// All operations take the zone name as provided by the caller; no
/// normalization is applied.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// List all records in the zone
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>>;

    /// Add records to the zone
    ///
    /// Returns the records as submitted: the provider does not report which
    /// exact lines it stored.
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;

    /// Make the zone contain `records`, replacing existing entries that share
    /// their identity
    ///
    /// Returns the desired records once both phases succeeded.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;

    /// Remove records from the zone
    ///
    /// Returns the records as submitted.
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
