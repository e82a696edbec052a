pub mod catalog;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use catalog::{default_mistakes, sort_catalog, EMOTIONAL_MISTAKES};
pub use enums::{AssetType, MistakeCategory, TradeSide};
pub use error::CoreError;
pub use structs::{MAX_DECIMAL_PLACES, MAX_INTEGER_DIGITS, Mistake, Symbol, Trade, User};
