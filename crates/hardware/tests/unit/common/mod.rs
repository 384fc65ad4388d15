//! # Common Component Tests
//!
//! Address decoding and configuration.

/// Tests for the tag/index/offset and page views of a physical address.
pub mod address_layout;
