pub mod dispatch;
pub mod estimate;
pub mod ledger;
pub mod options;
