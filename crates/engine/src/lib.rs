//! Domain library of Pennywise: money, periods, categories and transactions,
//! the monthly aggregation and budget math, CSV export, and the cached
//! data-access layer over the hosted backend.

pub use budget::BudgetProgress;
pub use cache::{CachedValue, QueryCache, QueryKey};
pub use categories::{Category, CategoryNew, CategoryPatch};
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use period::Period;
pub use stats::{CategoryTotal, Summary, aggregate};
pub use transactions::{CategoryRef, Transaction, TransactionKind, TransactionNew, TransactionPatch};

pub mod backend;
pub mod budget;
pub mod cache;
pub mod categories;
mod currency;
mod error;
pub mod export;
pub mod memory;
mod money;
mod ops;
mod period;
pub mod stats;
mod transactions;
mod util;

pub use ops::RECENT_LIMIT;

pub type ResultEngine<T> = Result<T, EngineError>;
