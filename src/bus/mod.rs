pub mod spi;

use embedded_error::mci::MciError;
use embedded_error::ImplError;

pub const SD_MMC_BLOCK_SIZE: usize = 512;
/// CRC16 trailing every data block, not checked in SPI mode
pub const SD_MMC_BLOCK_CRC_SIZE: usize = 2;

/// Byte level access to a card wired on a serial bus
pub trait Bus {
    /// Full duplex exchange of a single byte
    fn exchange(&mut self, value: u8) -> Result<u8, MciError>;

    /// Clock out `bytes`, dropping whatever the card sends back
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), MciError> {
        for &byte in bytes {
            self.exchange(byte)?;
        }
        Ok(())
    }

    /// Assert the card select line
    fn select(&mut self) -> Result<(), MciError>;

    /// Deassert the card select line
    fn deselect(&mut self) -> Result<(), MciError>;

    /// Consume one data block that follows a start token, copying `count` bytes starting at
    /// `offset` into `destination`.
    /// Everything outside the window, block CRC included, is clocked in and dropped so that
    /// the card ends up framed on a block boundary.
    /// A window reaching past the block is rejected before anything is clocked.
    fn read_window(
        &mut self,
        destination: &mut [u8],
        offset: usize,
        count: usize,
    ) -> Result<(), MciError> {
        copy_window(self, destination, offset, count)
    }

    /// Same as `read_window` but hands every byte of the window to `sink`
    fn forward_window(
        &mut self,
        offset: usize,
        count: usize,
        sink: &mut dyn FnMut(u8),
    ) -> Result<(), MciError> {
        stream_window(self, offset, count, sink)
    }
}

/// Block window copy in terms of `Bus::exchange`
pub fn copy_window<B: Bus + ?Sized>(
    bus: &mut B,
    destination: &mut [u8],
    offset: usize,
    count: usize,
) -> Result<(), MciError> {
    let window =
        destination.get_mut(..count).ok_or(MciError::Impl(ImplError::InvalidConfiguration))?;
    let mut slots = window.iter_mut();
    stream_window(bus, offset, count, &mut |byte| {
        if let Some(slot) = slots.next() {
            *slot = byte;
        }
    })
}

/// Block window streaming in terms of `Bus::exchange`
pub fn stream_window<B: Bus + ?Sized>(
    bus: &mut B,
    offset: usize,
    count: usize,
    sink: &mut dyn FnMut(u8),
) -> Result<(), MciError> {
    let end = offset + count;
    if end > SD_MMC_BLOCK_SIZE {
        return Err(MciError::Impl(ImplError::InvalidConfiguration));
    }
    for position in 0..SD_MMC_BLOCK_SIZE + SD_MMC_BLOCK_CRC_SIZE {
        let byte = bus.exchange(0xFF)?;
        if position >= offset && position < end {
            sink(byte);
        }
    }
    Ok(())
}
