mod error;
mod kill_ledger;
pub mod view;

#[cfg(test)]
mod ledger_tests;

pub use error::LedgerError;
pub use kill_ledger::{KillLedger, RecordedKill};
pub use view::{MenuEntryKind, MenuOption, OverlayRow};
