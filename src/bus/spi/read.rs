use embedded_error::mci::MciError;
use embedded_error::ImplError;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;

use crate::bus::{SD_MMC_BLOCK_CRC_SIZE, SD_MMC_BLOCK_SIZE};

use super::bus::SpiBus;

impl<SPI, CS, E, OE> SpiBus<SPI, CS>
where
    SPI: spi::Transfer<u8, Error = E> + spi::Write<u8, Error = E>,
    CS: OutputPin<Error = OE>,
{
    pub(crate) fn read_block_window(
        &mut self,
        destination: &mut [u8],
        offset: usize,
        count: usize,
    ) -> Result<(), MciError> {
        if offset + count > SD_MMC_BLOCK_SIZE {
            return Err(MciError::Impl(ImplError::InvalidConfiguration));
        }
        let window =
            destination.get_mut(..count).ok_or(MciError::Impl(ImplError::InvalidConfiguration))?;
        self.skip_bytes(offset)?;
        self.read_bytes(window)?;
        // Rest of the block and its CRC, not checked
        self.skip_bytes(SD_MMC_BLOCK_SIZE - offset - count + SD_MMC_BLOCK_CRC_SIZE)
    }

    pub(crate) fn forward_block_window(
        &mut self,
        offset: usize,
        count: usize,
        sink: &mut dyn FnMut(u8),
    ) -> Result<(), MciError> {
        if offset + count > SD_MMC_BLOCK_SIZE {
            return Err(MciError::Impl(ImplError::InvalidConfiguration));
        }
        self.skip_bytes(offset)?;
        for _ in 0..count {
            sink(self.read_byte()?);
        }
        self.skip_bytes(SD_MMC_BLOCK_SIZE - offset - count + SD_MMC_BLOCK_CRC_SIZE)
    }
}
