pub mod entity;

pub use entity::{DefaultEntityFactory, Entity, EntityFactory};
