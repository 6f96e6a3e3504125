pub mod logging;
pub mod normalize;
pub mod venue;

pub use logging::init_logging;
pub use normalize::{clean_whitespace, contains_all, fold_text};
pub use venue::Venue;
