pub mod receipt;
pub mod snapshot;

pub use receipt::*;
pub use snapshot::*;
