//! Non-volatile byte storage abstractions
//!
//! Provides an EEPROM-style byte-addressable store. Settings are written
//! as a fixed-layout record at a fixed address, so the trait deliberately
//! has no notion of keys, versions or wear leveling.

/// Errors from byte store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Address range lies outside the store
    OutOfRange,
    /// Underlying read failed
    Read,
    /// Underlying write failed
    Write,
    /// Underlying erase failed
    Erase,
}

/// Byte-addressable non-volatile store
///
/// Addresses are relative to the start of the store.
pub trait ByteStore {
    /// Fill `buf` with the bytes starting at `address`
    fn get(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StoreError>;

    /// Write `data` starting at `address`
    ///
    /// Bytes outside `address..address + data.len()` are preserved.
    fn put(&mut self, address: u32, data: &[u8]) -> Result<(), StoreError>;

    /// Size of the store in bytes
    fn capacity(&self) -> usize;
}

/// Erased-cell value for EEPROM and NOR flash
pub const ERASED_BYTE: u8 = 0xFF;

/// Check that `len` bytes at `address` fit in a store of `capacity` bytes
fn check_range(address: u32, len: usize, capacity: usize) -> Result<usize, StoreError> {
    let start = address as usize;
    match start.checked_add(len) {
        Some(end) if end <= capacity => Ok(start),
        _ => Err(StoreError::OutOfRange),
    }
}

/// RAM-backed store
///
/// Starts in the erased state. Useful for host simulation and tests, and
/// as a stand-in on boards without non-volatile memory.
#[derive(Debug, Clone)]
pub struct RamStore<const N: usize> {
    cells: [u8; N],
}

impl<const N: usize> Default for RamStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamStore<N> {
    /// Create an erased store
    pub const fn new() -> Self {
        Self {
            cells: [ERASED_BYTE; N],
        }
    }

    /// Raw contents
    pub fn bytes(&self) -> &[u8; N] {
        &self.cells
    }

    /// Raw contents, mutable (for fault injection)
    pub fn bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.cells
    }
}

impl<const N: usize> ByteStore for RamStore<N> {
    fn get(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        let start = check_range(address, buf.len(), N)?;
        buf.copy_from_slice(&self.cells[start..start + buf.len()]);
        Ok(())
    }

    fn put(&mut self, address: u32, data: &[u8]) -> Result<(), StoreError> {
        let start = check_range(address, data.len(), N)?;
        self.cells[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

/// EEPROM emulation on top of a NOR flash partition
///
/// Each `put` is a read-modify-erase-write of the one sector containing the
/// written range. `SECTOR` must equal the flash erase size. Writes that
/// straddle a sector boundary are rejected.
#[cfg(feature = "embedded-storage")]
pub struct NorFlashStore<F, const SECTOR: usize> {
    flash: F,
    /// Flash offset of the partition start (sector aligned)
    base: u32,
    /// Partition length in bytes (multiple of SECTOR)
    len: usize,
}

#[cfg(feature = "embedded-storage")]
impl<F, const SECTOR: usize> NorFlashStore<F, SECTOR>
where
    F: embedded_storage::nor_flash::NorFlash,
{
    /// Wrap `flash`, using `len` bytes starting at flash offset `base`
    pub fn new(flash: F, base: u32, len: usize) -> Self {
        Self { flash, base, len }
    }

    /// Release the underlying flash
    pub fn into_inner(self) -> F {
        self.flash
    }
}

#[cfg(feature = "embedded-storage")]
impl<F, const SECTOR: usize> ByteStore for NorFlashStore<F, SECTOR>
where
    F: embedded_storage::nor_flash::NorFlash,
{
    fn get(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        let start = check_range(address, buf.len(), self.len)?;
        self.flash
            .read(self.base + start as u32, buf)
            .map_err(|_| StoreError::Read)
    }

    fn put(&mut self, address: u32, data: &[u8]) -> Result<(), StoreError> {
        let start = check_range(address, data.len(), self.len)?;
        let sector_start = start - start % SECTOR;
        let offset = start - sector_start;
        if offset + data.len() > SECTOR {
            return Err(StoreError::OutOfRange);
        }

        let mut sector = [ERASED_BYTE; SECTOR];
        let flash_start = self.base + sector_start as u32;
        self.flash
            .read(flash_start, &mut sector)
            .map_err(|_| StoreError::Read)?;

        if &sector[offset..offset + data.len()] == data {
            return Ok(());
        }
        sector[offset..offset + data.len()].copy_from_slice(data);

        self.flash
            .erase(flash_start, flash_start + SECTOR as u32)
            .map_err(|_| StoreError::Erase)?;
        self.flash
            .write(flash_start, &sector)
            .map_err(|_| StoreError::Write)
    }

    fn capacity(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_store_starts_erased() {
        let mut store = RamStore::<16>::new();
        let mut buf = [0u8; 4];
        store.get(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 4]);
    }

    #[test]
    fn test_ram_store_put_get() {
        let mut store = RamStore::<16>::new();
        store.put(3, &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 5];
        store.get(2, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE, 1, 2, 3, ERASED_BYTE]);
    }

    #[test]
    fn test_ram_store_out_of_range() {
        let mut store = RamStore::<8>::new();
        assert_eq!(store.put(6, &[0; 3]), Err(StoreError::OutOfRange));
        assert_eq!(store.get(u32::MAX, &mut [0; 2]), Err(StoreError::OutOfRange));
        // Exactly at the end is fine
        assert!(store.put(5, &[0; 3]).is_ok());
    }
}
