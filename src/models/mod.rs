pub mod card;
pub mod enums;
pub mod flags;
pub mod printing;
pub mod raw;

pub use card::*;
pub use enums::*;
pub use flags::*;
pub use printing::*;
pub use raw::*;
