//! Menu screens
//!
//! ```text
//!            Open              Select(item)
//!  Splash ---------> Main ------------------> SetAngle | Settings | Save
//!    ^                 |                                   |
//!    |   Select(Exit)  |                      Confirm      |
//!    +-----------------+<----------------------------------+
//!    |            Back (long press) from any screen        |
//!    +-----------------------------------------------------+
//! ```

use super::events::MenuEvent;

/// Number of entries in the main menu
pub const ITEM_COUNT: u8 = 4;

/// Menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Idle screen showing the current angle
    #[default]
    Splash,
    /// Main menu list
    Main,
    /// Digit-wise target angle entry
    SetAngle,
    /// Rotation direction selection
    Settings,
    /// Save confirmation
    Save,
}

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainItem {
    SetAngle,
    Settings,
    Save,
    Exit,
}

impl MainItem {
    /// Entry at a menu index, wrapping modulo [`ITEM_COUNT`]
    pub fn from_index(index: u8) -> Self {
        match index % ITEM_COUNT {
            0 => MainItem::SetAngle,
            1 => MainItem::Settings,
            2 => MainItem::Save,
            _ => MainItem::Exit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MainItem::SetAngle => "Set Angle",
            MainItem::Settings => "Settings",
            MainItem::Save => "Save",
            MainItem::Exit => "Exit",
        }
    }
}

/// Which digit the dial edits on the SetAngle screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitMode {
    #[default]
    Units,
    Tens,
    Hundreds,
}

impl DigitMode {
    /// Degrees per dial detent
    pub fn step(self) -> i32 {
        match self {
            DigitMode::Units => 1,
            DigitMode::Tens => 10,
            DigitMode::Hundreds => 100,
        }
    }

    /// Units -> Tens -> Hundreds -> Units
    pub fn next(self) -> Self {
        match self {
            DigitMode::Units => DigitMode::Tens,
            DigitMode::Tens => DigitMode::Hundreds,
            DigitMode::Hundreds => DigitMode::Units,
        }
    }
}

impl Screen {
    /// Check if the dial edits a value on this screen
    pub fn is_editing(&self) -> bool {
        matches!(self, Screen::SetAngle | Screen::Settings)
    }

    /// Process an event and return the next screen
    pub fn transition(self, event: MenuEvent) -> Self {
        use MenuEvent::*;
        use Screen::*;

        match (self, event) {
            (Splash, Open) => Main,

            (Main, Select(MainItem::SetAngle)) => SetAngle,
            (Main, Select(MainItem::Settings)) => Settings,
            (Main, Select(MainItem::Save)) => Save,
            (Main, Select(MainItem::Exit)) => Splash,

            (SetAngle | Settings | Save, Confirm) => Splash,

            (Main | SetAngle | Settings | Save, Back) => Splash,

            // Default: stay on the current screen
            _ => self,
        }
    }
}
