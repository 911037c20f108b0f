pub mod allocation;

pub use allocation::{allocate, Allocation, AllocationRequest, AllocationRoute, BalanceCheck};
