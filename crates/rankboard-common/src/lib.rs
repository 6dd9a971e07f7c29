pub mod dataset;
pub mod date;
pub mod error;
pub mod value;

pub use dataset::*;
pub use date::parse_date_like;
pub use error::*;
pub use value::*;
