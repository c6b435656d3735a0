pub mod newman;
pub mod notify;
pub mod resolvers;
