pub mod accrual;
pub mod period;
pub mod rate;

pub use accrual::AccrualEngine;
pub use period::{decompose, Period};
pub use rate::{RateResolution, RateResolver, RateTables, RateTier, StatutoryRate};
