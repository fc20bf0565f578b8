pub mod entities;
pub mod helpers;
pub mod markup;
pub mod ports;
pub mod render;
pub mod schema;
pub mod services;
pub mod session;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
