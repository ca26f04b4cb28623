pub mod bounds;
pub mod normalize;
pub mod snapshot;

pub use bounds::{MAX_AMOUNT, MAX_QUANTITY, MAX_RATE, MAX_TERM_MONTHS};
pub use normalize::{normalize, RawInput};
pub use snapshot::*;
