pub mod preferences;
pub mod record;
pub mod validate;

pub use preferences::*;
pub use record::*;
pub use validate::*;
