pub mod error;
pub mod measures;
pub mod resolver;

pub use error::ResolveError;
pub use measures::{Measures, UNMARSHAL_FAILURE_COUNTER};
pub use resolver::EventResolver;
