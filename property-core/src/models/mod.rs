mod property;
mod property_input;
mod rental_mode;

pub use property::{Property, PropertyDetails};
pub use property_input::PropertyInput;
pub use rental_mode::{RentalMode, RentalModeParseError};
