use crate::domain::entities::product::VectorRecord;
use crate::domain::error::DomainError;

/// What happens when an insert collides with an existing id. An explicit
/// policy chosen at store construction, not accidental behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Colliding inserts fail with `DuplicateId`.
    Reject,
    /// Colliding inserts replace the existing record.
    Upsert,
}

/// Persistent collection of `(id, vector, metadata)` records.
///
/// All vectors in one store share a dimensionality `D`, established by the
/// first successful insert and cleared by `delete_all`. Scans are
/// snapshot-style: mutations concurrent with a scan never corrupt it, and a
/// query may or may not observe a concurrently-completing insert.
pub trait VectorStore: Send + Sync {
    /// Fails with `DimensionMismatch` if the vector's length disagrees with
    /// the established dimensionality, leaving the store unchanged. Fails
    /// with `DuplicateId` on id collision under `InsertPolicy::Reject`.
    fn insert(&self, record: &VectorRecord) -> Result<(), DomainError>;

    /// Removes one record; `false` when the id was absent.
    fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Removes every record, returns the count removed. Resets the stored
    /// dimensionality so the next insert may establish a new one.
    fn delete_all(&self) -> Result<usize, DomainError>;

    /// Snapshot of all current records in insertion order.
    fn scan_all(&self) -> Result<Vec<VectorRecord>, DomainError>;

    fn count(&self) -> Result<usize, DomainError>;

    /// Dimensionality of the stored vectors, `None` when the store is empty.
    fn stored_dimension(&self) -> Result<Option<usize>, DomainError>;
}
