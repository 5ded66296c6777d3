pub mod field;
pub mod row;
pub mod view;
pub mod response;

pub use field::*;
pub use row::*;
pub use view::*;
pub use response::*;
