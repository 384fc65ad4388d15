pub mod cache;

pub use self::cache::SramCache;
