//! Concrete repository implementations.

pub mod location;
pub mod user;

pub use location::LocationRepository;
pub use user::UserRepository;
