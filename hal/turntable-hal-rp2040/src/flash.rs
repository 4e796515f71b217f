//! Settings storage in on-board flash
//!
//! The settings record lives in the last 4 KiB sector of the 2 MiB flash,
//! emulating an EEPROM through [`NorFlashStore`].

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use turntable_hal::eeprom::NorFlashStore;

/// Flash size on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
/// One erase sector for settings
pub const SETTINGS_PARTITION_SIZE: usize = ERASE_SIZE;
pub const SETTINGS_PARTITION_START: u32 = (FLASH_SIZE - SETTINGS_PARTITION_SIZE) as u32;

/// Byte store over the settings sector
pub type SettingsFlash<'d> = NorFlashStore<Flash<'d, FLASH, Blocking, FLASH_SIZE>, ERASE_SIZE>;

/// Open the settings sector
pub fn settings_store(flash: Peri<'_, FLASH>) -> SettingsFlash<'_> {
    NorFlashStore::new(
        Flash::new_blocking(flash),
        SETTINGS_PARTITION_START,
        SETTINGS_PARTITION_SIZE,
    )
}
