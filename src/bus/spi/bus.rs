use embedded_error::mci::MciError;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;

use crate::bus::Bus;

/// Card on a blocking SPI bus with a dedicated chip select pin
pub struct SpiBus<SPI, CS> {
    pub(crate) spi: SPI,
    cs: CS,
}

impl<SPI, CS, E, OE> SpiBus<SPI, CS>
where
    SPI: spi::Transfer<u8, Error = E> + spi::Write<u8, Error = E>,
    CS: OutputPin<Error = OE>,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Give back the SPI peripheral and the chip select pin
    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, MciError> {
        let mut retval = 0xFF;
        self.spi.transfer(core::slice::from_mut(&mut retval)).map_err(|_| MciError::ReadError)?;
        Ok(retval)
    }

    /// Clock in `bytes.len()` bytes while holding MOSI high
    pub(crate) fn read_bytes<'a>(&mut self, bytes: &'a mut [u8]) -> Result<&'a [u8], MciError> {
        for byte in bytes.iter_mut() {
            *byte = 0xFF;
        }
        self.spi.transfer(bytes).map_err(|_| MciError::ReadError)?;
        Ok(bytes)
    }

    pub(crate) fn skip_bytes(&mut self, mut count: usize) -> Result<(), MciError> {
        let mut scratch = [0xFFu8; 16];
        while count > 0 {
            let n = count.min(scratch.len());
            self.read_bytes(&mut scratch[..n])?;
            count -= n;
        }
        Ok(())
    }
}

impl<SPI, CS, E, OE> Bus for SpiBus<SPI, CS>
where
    SPI: spi::Transfer<u8, Error = E> + spi::Write<u8, Error = E>,
    CS: OutputPin<Error = OE>,
{
    fn exchange(&mut self, value: u8) -> Result<u8, MciError> {
        let mut retval = value;
        self.spi.transfer(core::slice::from_mut(&mut retval)).map_err(|_| MciError::WriteError)?;
        Ok(retval)
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), MciError> {
        self.spi.write(bytes).map_err(|_| MciError::WriteError)
    }

    fn select(&mut self) -> Result<(), MciError> {
        self.cs.set_low().map_err(|_| MciError::CouldNotSelectDevice)
    }

    fn deselect(&mut self) -> Result<(), MciError> {
        self.cs.set_high().map_err(|_| MciError::CouldNotSelectDevice)
    }

    fn read_window(
        &mut self,
        destination: &mut [u8],
        offset: usize,
        count: usize,
    ) -> Result<(), MciError> {
        self.read_block_window(destination, offset, count)
    }

    fn forward_window(
        &mut self,
        offset: usize,
        count: usize,
        sink: &mut dyn FnMut(u8),
    ) -> Result<(), MciError> {
        self.forward_block_window(offset, count, sink)
    }
}
