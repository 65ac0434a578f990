pub mod distance;
pub mod error;
pub mod filter;
pub mod model;
pub mod path;
pub mod score;
pub mod view;

pub use distance::*;
pub use error::CoreError;
pub use filter::*;
pub use model::*;
pub use path::*;
pub use score::*;
pub use view::*;
