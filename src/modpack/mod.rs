pub mod manifest;
pub mod version;

pub use manifest::{ModEntry, ModpackIndex};
pub use version::GameVersion;
