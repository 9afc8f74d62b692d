//! Domain entities - Objects with identity

mod catch_record;

pub use catch_record::{CatchRecord, CatchTable};
