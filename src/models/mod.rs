pub mod record;

pub use record::{NewWorkRecord, WorkRecord};
