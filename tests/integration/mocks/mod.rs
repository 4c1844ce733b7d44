mod transports;

pub use fake_ledger::*;
pub use transports::*;
