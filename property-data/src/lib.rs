mod loader;

pub use loader::{PropertyLoader, PropertyLoaderError, PropertyRecord};
