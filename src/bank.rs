// Bank Model - the account record exposed over the API
//
// A Bank is keyed by its account number: two records with the same
// account number are the same bank, so the store enforces uniqueness.

use serde::{Deserialize, Serialize};

/// Bank record.
///
/// Wire shape (camelCase, matching the public API contract):
/// `{ "accountNumber": "0001", "trust": 0.1, "transactionFee": 1 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    /// Unique account number - the primary key of the record
    pub account_number: String,

    /// Trust / interest rate attached to the account
    pub trust: f64,

    /// Fee charged per transaction
    pub transaction_fee: i64,
}

impl Bank {
    pub fn new(account_number: impl Into<String>, trust: f64, transaction_fee: i64) -> Self {
        Bank {
            account_number: account_number.into(),
            trust,
            transaction_fee,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
