pub mod policy;
pub mod synthetic;

pub use policy::{BotStrategy, Policy, PolicyContext, SeekerPolicy, UniformPolicy};
pub use synthetic::SyntheticInput;
