//! Types that represent the core data model, such as `Transaction`, `Snapshot` and `Category`.
mod amount;
mod category;
mod snapshot;
mod transaction;

pub use amount::{Amount, AmountError, AmountFormat, CURRENCY};
pub use category::{label_for, Category, CategoryInfo};
pub use snapshot::Snapshot;
pub use transaction::{RawTransaction, SkipReason, Transaction};
