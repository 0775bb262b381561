use crate::domain::entities::product::{ProductInfo, VectorRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::{InsertPolicy, VectorStore};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::Mutex;

/// SQLite-backed record store. Vectors are little-endian f32 blobs, product
/// metadata a JSON column. One connection behind a mutex: mutations are
/// atomic with respect to each other, and `scan_all` materializes its
/// snapshot while holding the lock.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    policy: InsertPolicy,
}

impl SqliteVectorStore {
    pub fn new(conn: Connection, policy: InsertPolicy) -> Self {
        Self {
            conn: Mutex::new(conn),
            policy,
        }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }

    fn dimension_of(conn: &Connection) -> Result<Option<usize>, DomainError> {
        let mut stmt = conn.prepare("SELECT dim FROM products LIMIT 1")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => {
                let dim: i64 = row.get(0)?;
                Ok(Some(dim as usize))
            }
            None => Ok(None),
        }
    }
}

impl VectorStore for SqliteVectorStore {
    fn insert(&self, record: &VectorRecord) -> Result<(), DomainError> {
        if record.vector.is_empty() {
            return Err(DomainError::InvalidArgument(format!(
                "record {} has an empty vector",
                record.id
            )));
        }
        let conn = self.lock()?;

        // D is established by the first successful insert and enforced for
        // every later one; a mismatch rejects the insert before any write.
        if let Some(expected) = Self::dimension_of(&conn)? {
            if record.vector.len() != expected {
                return Err(DomainError::DimensionMismatch {
                    expected,
                    actual: record.vector.len(),
                });
            }
        }

        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE id = ?1",
            params![record.id],
            |r| r.get(0),
        )?;
        if exists > 0 && self.policy == InsertPolicy::Reject {
            return Err(DomainError::DuplicateId(record.id.clone()));
        }

        let blob = Self::serialize_vector(&record.vector);
        let product = serde_json::to_string(&record.product)
            .map_err(|e| DomainError::Parse(format!("metadata encode: {e}")))?;
        conn.execute(
            "INSERT OR REPLACE INTO products (id, vector, dim, product, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                blob,
                record.vector.len() as i64,
                product,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let conn = self.lock()?;
        let n = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    fn delete_all(&self) -> Result<usize, DomainError> {
        let conn = self.lock()?;
        let n = conn.execute("DELETE FROM products", [])?;
        Ok(n)
    }

    fn scan_all(&self) -> Result<Vec<VectorRecord>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, vector, product, created_at FROM products ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let product: String = row.get(2)?;
            let created_at: String = row.get(3)?;
            Ok((id, blob, product, created_at))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, blob, product, created_at) = row?;
            let product: ProductInfo = serde_json::from_str(&product)
                .map_err(|e| DomainError::Parse(format!("metadata for {id}: {e}")))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| DomainError::Parse(format!("timestamp for {id}: {e}")))?
                .with_timezone(&Utc);
            records.push(VectorRecord {
                id,
                vector: Self::deserialize_vector(&blob),
                product,
                created_at,
            });
        }
        Ok(records)
    }

    fn count(&self) -> Result<usize, DomainError> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    fn stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        let conn = self.lock()?;
        Self::dimension_of(&conn)
    }
}
