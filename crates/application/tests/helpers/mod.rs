#![allow(dead_code, unused_imports)]
mod mock_upstream;
mod zone;

pub use mock_upstream::*;
pub use zone::*;
