use crate::domain::{Coordinate, Settings};

#[derive(Debug)]
pub enum Event {
    CoordinateObserved(Coordinate),
    SettingsChanged(Settings),
}
