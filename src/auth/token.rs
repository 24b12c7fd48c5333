//! Token values handed to callers and the cache entries that wrap them.

pub mod entry;
pub mod issued;
pub mod secret;
