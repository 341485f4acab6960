//! Handlers that sit outside the versioned API.

mod system;


pub use system::*;
