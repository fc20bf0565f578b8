pub mod observation;
pub mod session_state;

pub use observation::*;
pub use session_state::*;
