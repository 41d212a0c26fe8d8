//! Passes over the aggregated mapping, in chain order.

mod accessors;
mod enums;
mod globals;
mod ignored;
mod overrides;
mod quirks;

pub use accessors::Accessors;
pub use enums::Enums;
pub use globals::{GlobalMembers, GLOBAL_CLASS_DOC};
pub use ignored::IgnoredClasses;
pub use overrides::Overrides;
pub use quirks::{Ext4EventOptions, FrameworkQuirks, QuirkRule};
