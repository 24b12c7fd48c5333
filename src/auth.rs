//! Credential tuples, cache keys, output modes, and cached token values.

pub mod credentials;
pub mod key;
pub mod mode;
pub mod token;

pub use credentials::*;
pub use key::*;
pub use mode::*;
pub use token::{entry::*, issued::*, secret::*};
