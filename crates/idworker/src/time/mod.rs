mod epoch;
mod interface;
mod mono_clock;
mod system_clock;

pub use epoch::*;
pub use interface::*;
pub use mono_clock::*;
pub use system_clock::*;
