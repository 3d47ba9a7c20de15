pub mod choice;
pub mod selection;
pub mod user;

pub use choice::*;
pub use selection::*;
pub use user::*;
