pub mod interaction;
pub mod schema_loader;

pub use interaction::InteractionLoop;
