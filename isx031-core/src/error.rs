//! Error re-exports
//!
//! The unified error type lives in the isx031-error crate so that every
//! component shares one taxonomy.

pub use isx031_error::{Isx031Error, Result};
