//! Service layer for the history ledger.

mod ledger;

pub use ledger::{HistoryLedger, HistoryLedgerError, HistoryLedgerResult};
