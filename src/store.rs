// Bank Store - SQLite-backed keyed store for Bank records
//
// The store owns the uniqueness invariant: account_number is the primary
// key, and insert relies on the constraint so that insert-if-absent is a
// single atomic statement even under concurrent writers.

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::bank::Bank;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No bank exists with the requested account number
    #[error("no bank with account number {0}")]
    NotFound(String),

    /// A bank with this account number already exists
    #[error("bank with account number {0} already exists")]
    DuplicateAccount(String),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed store for Bank records, shared across request handlers.
///
/// Wraps a single SQLite connection behind a mutex; each operation takes
/// the lock for the duration of one statement.
#[derive(Clone)]
pub struct BankStore {
    conn: Arc<Mutex<Connection>>,
}

impl BankStore {
    /// Open a store over an existing connection, creating the schema.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        setup_database(&conn)?;
        Ok(BankStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store, used by the default server mode and by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        BankStore::new(Connection::open_in_memory()?)
    }

    /// Insert the fixture banks if the table is empty.
    pub fn seed_defaults(&self) -> StoreResult<usize> {
        if !self.all()?.is_empty() {
            return Ok(0);
        }

        let defaults = [
            Bank::new("0001", 0.1, 1),
            Bank::new("0010", 17.0, 0),
            Bank::new("0100", 3.5, 2),
        ];

        for bank in &defaults {
            self.insert(bank)?;
        }

        Ok(defaults.len())
    }

    /// All banks, ordered by account number.
    pub fn all(&self) -> StoreResult<Vec<Bank>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT account_number, trust, transaction_fee
             FROM banks
             ORDER BY account_number",
        )?;

        let banks = stmt
            .query_map([], |row| {
                Ok(Bank {
                    account_number: row.get(0)?,
                    trust: row.get(1)?,
                    transaction_fee: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(banks)
    }

    /// Look up a single bank by account number.
    pub fn get(&self, account_number: &str) -> StoreResult<Bank> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT account_number, trust, transaction_fee
             FROM banks
             WHERE account_number = ?1",
            params![account_number],
            |row| {
                Ok(Bank {
                    account_number: row.get(0)?,
                    trust: row.get(1)?,
                    transaction_fee: row.get(2)?,
                })
            },
        );

        match result {
            Ok(bank) => Ok(bank),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StoreError::NotFound(account_number.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Insert-if-absent: store the bank, or fail with `DuplicateAccount`
    /// if its account number is already taken. The existing record is
    /// never touched on failure.
    pub fn insert(&self, bank: &Bank) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let result = conn.execute(
            "INSERT INTO banks (account_number, trust, transaction_fee)
             VALUES (?1, ?2, ?3)",
            params![bank.account_number, bank.trust, bank.transaction_fee],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateAccount(bank.account_number.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    // Enable WAL mode for crash recovery (no-op for in-memory databases)
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS banks (
            account_number TEXT PRIMARY KEY,
            trust REAL NOT NULL,
            transaction_fee INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> BankStore {
        let store = BankStore::open_in_memory().unwrap();
        store.seed_defaults().unwrap();
        store
    }

    #[test]
    fn test_seed_defaults_orders_fixture_first() {
        let store = seeded_store();

        let banks = store.all().unwrap();
        assert_eq!(banks.len(), 3);
        assert_eq!(banks[0].account_number, "0001");
    }

    #[test]
    fn test_seed_defaults_is_idempotent() {
        let store = seeded_store();

        assert_eq!(store.seed_defaults().unwrap(), 0);
        assert_eq!(store.all().unwrap().len(), 3);
    }

    #[test]
    fn test_get_existing_bank() {
        let store = seeded_store();

        let bank = store.get("0001").unwrap();
        assert_eq!(bank.trust, 0.1);
        assert_eq!(bank.transaction_fee, 1);
    }

    #[test]
    fn test_get_missing_bank_is_not_found() {
        let store = seeded_store();

        let result = store.get("does not exist");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let store = seeded_store();
        let bank = Bank::new("acc123", 23.1, 3);

        store.insert(&bank).unwrap();
        assert_eq!(store.get("acc123").unwrap(), bank);
    }

    #[test]
    fn test_insert_duplicate_rejected_and_original_kept() {
        let store = seeded_store();

        let result = store.insert(&Bank::new("0001", 99.9, 42));
        match result {
            Err(StoreError::DuplicateAccount(account)) => assert_eq!(account, "0001"),
            other => panic!("expected DuplicateAccount, got {:?}", other),
        }

        // The original record is untouched
        let original = store.get("0001").unwrap();
        assert_eq!(original.trust, 0.1);
        assert_eq!(original.transaction_fee, 1);
    }

    #[test]
    fn test_concurrent_inserts_only_one_wins() {
        let store = seeded_store();

        let handles: Vec<_> = (0..8)
            .map(|fee| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(&Bank::new("race", 1.0, fee)))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|result| result.is_ok())
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.get("race").unwrap().trust, 1.0);
    }
}
