//! File-backed state (pending offers, published-history ledger).
//!
//! どちらも単一プロセス・単一書き手のファイル。書き込みは常にファイル全体を
//! atomic に置き換える。

mod atomic;
mod ledger;
mod offer_store;

pub use ledger::{Ledger, LedgerEntry, LedgerMap};
pub use offer_store::{EMPTY_STORE, OfferStore, is_cleared};
