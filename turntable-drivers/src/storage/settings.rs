//! Settings record on a byte store
//!
//! Loading never fails: a store read error, a corrupt record or an
//! out-of-bounds position all fall back to safe values, and the reason is
//! reported alongside so the firmware can log it.

use turntable_core::config::StorageConfig;
use turntable_core::motion::Direction;
use turntable_core::settings::{RecordError, SettingsRecord, RECORD_LEN};
use turntable_hal::{ByteStore, StoreError};

/// Why stored settings were not restored as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsFault {
    /// The store could not be read; defaults used
    Store(StoreError),
    /// The record failed validation; defaults used
    Record(RecordError),
    /// Position outside the accepted bounds; position reset to 0
    PositionOutOfBounds(i32),
}

/// Result of [`PersistentStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Loaded {
    pub record: SettingsRecord,
    pub fault: Option<SettingsFault>,
}

/// Persists a [`SettingsRecord`] at a fixed address
pub struct PersistentStore<S> {
    store: S,
    config: StorageConfig,
}

impl<S: ByteStore> PersistentStore<S> {
    pub fn new(store: S, config: StorageConfig) -> Self {
        Self { store, config }
    }

    /// Write position, direction and zero offset
    pub fn save_settings(
        &mut self,
        position: i32,
        direction: Direction,
        zero_offset: i32,
    ) -> Result<(), StoreError> {
        self.save(&SettingsRecord::new(position, direction, zero_offset))
    }

    pub fn save(&mut self, record: &SettingsRecord) -> Result<(), StoreError> {
        self.store.put(self.config.base_address, &record.to_bytes())
    }

    /// Read the stored settings, substituting safe values where needed
    pub fn load(&mut self) -> Loaded {
        let mut buf = [0u8; RECORD_LEN];
        if let Err(e) = self.store.get(self.config.base_address, &mut buf) {
            return Loaded {
                record: SettingsRecord::default(),
                fault: Some(SettingsFault::Store(e)),
            };
        }

        let record = match SettingsRecord::from_bytes(&buf) {
            Ok(record) => record,
            Err(e) => {
                return Loaded {
                    record: SettingsRecord::default(),
                    fault: Some(SettingsFault::Record(e)),
                }
            }
        };

        if self.config.accepts(record.position) {
            Loaded {
                record,
                fault: None,
            }
        } else {
            Loaded {
                record: record.with_position_bounds(self.config.min_pos, self.config.max_pos),
                fault: Some(SettingsFault::PositionOutOfBounds(record.position)),
            }
        }
    }

    /// Stored settings, or `(0, CW, 0)` if they cannot be trusted
    pub fn load_settings(&mut self) -> SettingsRecord {
        self.load().record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turntable_hal::RamStore;

    fn store() -> PersistentStore<RamStore<64>> {
        PersistentStore::new(RamStore::new(), StorageConfig::default())
    }

    #[test]
    fn test_save_then_load() {
        let mut s = store();
        s.save_settings(500, Direction::CounterClockwise, 200).unwrap();
        let loaded = s.load();
        assert_eq!(loaded.fault, None);
        assert_eq!(
            loaded.record,
            SettingsRecord::new(500, Direction::CounterClockwise, 200)
        );
    }

    #[test]
    fn test_blank_store_gives_defaults() {
        let mut s = store();
        let loaded = s.load();
        assert_eq!(loaded.record, SettingsRecord::default());
        assert_eq!(
            loaded.fault,
            Some(SettingsFault::Record(RecordError::InvalidDirection(0xFF)))
        );
    }

    #[test]
    fn test_flipped_byte_gives_defaults() {
        let mut s = store();
        s.save_settings(500, Direction::CounterClockwise, 200).unwrap();
        s.store_mut().bytes_mut()[6] ^= 0x01;
        assert_eq!(s.load_settings(), SettingsRecord::default());
    }

    #[test]
    fn test_out_of_bounds_position() {
        let mut s = store();
        s.save_settings(5000, Direction::CounterClockwise, 77).unwrap();
        let loaded = s.load();
        assert_eq!(
            loaded.record,
            SettingsRecord::new(0, Direction::CounterClockwise, 77)
        );
        assert_eq!(loaded.fault, Some(SettingsFault::PositionOutOfBounds(5000)));
    }

    #[test]
    fn test_base_address() {
        let config = StorageConfig {
            base_address: 32,
            ..StorageConfig::default()
        };
        let mut s = PersistentStore::new(RamStore::<64>::new(), config);
        s.save_settings(1, Direction::Clockwise, 2).unwrap();
        assert!(s.store().bytes()[..32].iter().all(|b| *b == 0xFF));
        assert_eq!(s.load_settings(), SettingsRecord::new(1, Direction::Clockwise, 2));
    }

    #[test]
    fn test_store_errors() {
        let config = StorageConfig {
            base_address: 60,
            ..StorageConfig::default()
        };
        let mut s = PersistentStore::new(RamStore::<64>::new(), config);
        assert_eq!(
            s.save_settings(1, Direction::Clockwise, 2),
            Err(StoreError::OutOfRange)
        );
        assert_eq!(
            s.load().fault,
            Some(SettingsFault::Store(StoreError::OutOfRange))
        );
    }
}
