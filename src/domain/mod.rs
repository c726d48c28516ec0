// Domain module: roster entities, solver-neutral models and the solver contract

pub mod entities;
pub mod models;
pub mod roster;
pub mod solver_service;
pub mod value_objects;

pub use entities::*;
pub use models::*;
pub use roster::*;
pub use solver_service::*;
pub use value_objects::*;
