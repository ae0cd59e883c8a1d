pub mod events;

mod coordinate;
mod settings;

pub use coordinate::Coordinate;
pub use settings::{Hotkey, HotkeyError, MarkerStyle, Settings};
