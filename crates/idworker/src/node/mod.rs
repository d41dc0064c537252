mod node_id;
mod provider;
mod rand_source;
#[cfg(feature = "rand")]
mod thread_random;

pub use node_id::*;
pub use provider::*;
pub use rand_source::*;
#[cfg_attr(docsrs, doc(cfg(feature = "rand")))]
#[cfg(feature = "rand")]
pub use thread_random::*;
