pub mod currency;
pub mod error;
pub mod latency;
pub mod pagination;
pub mod sequence;
pub mod store;
pub mod timezone;
pub mod traits;

pub use currency::{Currency, MAX_AMOUNT, MAX_QUANTITY};
pub use error::{AppError, Result};
pub use latency::{Operation, SimulatedLatency, MAX_LATENCY_FACTOR};
pub use pagination::{paginate, PageRequest, Paginated, SortOrder};
pub use store::{Entity, InMemoryStore, StoreGuard};
pub use timezone::TimezoneConverter;
