pub mod issue;
pub mod user;
pub mod search;

pub use issue::*;
pub use user::*;
pub use search::*;
