pub mod events;
pub mod identity;
pub mod ports;
pub mod report;
pub mod runtime;
pub mod session;

pub use events::*;
pub use identity::*;
pub use ports::*;
pub use report::*;
pub use runtime::*;
pub use session::*;
