use strum_macros::Display;

use crate::journey_manager::TravelPace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            meta: false,
        }
    }
}

/// Everything the shell can feed into a session. Pointer positions are in
/// screen pixels.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp,
    Click {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    Wheel {
        delta_y: f64,
    },
    MenuHover(bool),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetDistanceInput(String),
    SubmitCalibration,
    ResetCalibration,
    AddJourney,
    SelectJourney(usize),
    DeleteJourney(usize),
    ResetJourney(usize),
    UndoJourney,
    SetMilesPerDay(f64),
    SetPace(TravelPace),
    Resize {
        width: f64,
        height: f64,
    },
}
