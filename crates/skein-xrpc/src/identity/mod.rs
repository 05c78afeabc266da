//! Identity resolution.

mod dns;
mod resolver;

pub use dns::{HickoryTxtResolver, TxtResolver};
pub use resolver::{DEFAULT_LOOKUP_TIMEOUT, HandleResolver, ResolverOptions};
