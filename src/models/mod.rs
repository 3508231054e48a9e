pub mod collection;
pub mod media_item;
pub mod provider;

pub use collection::*;
pub use media_item::*;
pub use provider::*;
