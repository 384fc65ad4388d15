//! Types shared by every layer of the memory hierarchy.

pub mod addr;
pub mod constants;
pub mod error;

pub use self::addr::{AddressLayout, CacheAddr, PhysAddr};
pub use self::error::{MemError, Result};
