//! Events that drive the menu and the control loop

use super::machine::MainItem;

/// Debounced button events delivered by the firmware button tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Encoder push button released before the long-press time
    EncoderClick,
    /// Encoder push button held past the long-press time
    EncoderLongPress,
    /// Digit-mode button (units/tens/hundreds)
    DigitMode,
    /// Start/stop button
    StartStop,
    /// Zero-calibration button
    SetZero,
    /// Fine-adjust button (also emitted on auto-repeat)
    FineStep,
}

impl ButtonEvent {
    /// Whether the event is consumed by the menu rather than the loop
    pub fn is_menu_event(self) -> bool {
        matches!(
            self,
            ButtonEvent::EncoderClick | ButtonEvent::EncoderLongPress | ButtonEvent::DigitMode
        )
    }
}

/// Screen transition events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    /// Leave the splash screen for the main menu
    Open,
    /// Enter the highlighted main menu item
    Select(MainItem),
    /// Confirm the current sub-screen and return to splash
    Confirm,
    /// Abandon the menu (long press)
    Back,
}
