use embedded_error::mci::{CommandOrDataError, MciError};
use embedded_error::ImplError;
use log::{debug, warn};

use crate::bus::{Bus, SD_MMC_BLOCK_SIZE};
use crate::commands::SDMMC_CMD17_READ_SINGLE_BLOCK;
use crate::response::{R1Response, BLOCK_READ_DATA_TOKEN, BLOCK_READ_PENDING};

use super::controller::{Controller, DATA_TOKEN_POLL_BYTES};

impl<BUS: Bus> Controller<BUS> {
    /// Read `count` bytes starting at byte `offset` of block `block` into `destination`.
    ///
    /// The window must lie within the block and `destination` must hold `count` bytes.
    /// On error the content of `destination` is unspecified.
    pub fn read_partial(
        &mut self,
        destination: &mut [u8],
        block: u32,
        offset: u16,
        count: u16,
    ) -> Result<(), MciError> {
        let capacity = destination.len();
        self.read_block(block, offset, count, capacity, |bus, offset, count| {
            bus.read_window(destination, offset, count)
        })
    }

    /// Same as `read_partial` but streams the window into `sink` byte by byte
    pub fn forward_partial(
        &mut self,
        block: u32,
        offset: u16,
        count: u16,
        sink: &mut dyn FnMut(u8),
    ) -> Result<(), MciError> {
        self.read_block(block, offset, count, count as usize, |bus, offset, count| {
            bus.forward_window(offset, count, sink)
        })
    }

    fn read_block<F>(
        &mut self,
        block: u32,
        offset: u16,
        count: u16,
        capacity: usize,
        transfer: F,
    ) -> Result<(), MciError>
    where
        F: FnOnce(&mut BUS, usize, usize) -> Result<(), MciError>,
    {
        debug!("Read {} bytes @ {}+{}", count, block, offset);
        let result = match self.start_read_block(block, offset, count, capacity) {
            Ok(()) => transfer(&mut self.bus, offset as usize, count as usize),
            Err(e) => Err(e),
        };
        let released = self.release();
        result.and(released)
    }

    fn start_read_block(
        &mut self,
        block: u32,
        offset: u16,
        count: u16,
        capacity: usize,
    ) -> Result<(), MciError> {
        let card_type = self.card_type.ok_or(MciError::NoCard)?;
        let (offset, count) = (offset as usize, count as usize);
        if count == 0 || offset + count > SD_MMC_BLOCK_SIZE || capacity < count {
            return Err(MciError::Impl(ImplError::InvalidConfiguration));
        }

        // SDSC Card (CCS=0) uses byte unit address,
        // SDHC and SDXC Cards (CCS=1) use block unit address (512 Bytes unit).
        let mut arg = block;
        if !card_type.block_addressed() {
            arg = block
                .checked_mul(SD_MMC_BLOCK_SIZE as u32)
                .ok_or(MciError::Impl(ImplError::InvalidConfiguration))?;
        }

        let r1 = R1Response(self.send_command(SDMMC_CMD17_READ_SINGLE_BLOCK, arg)?);
        if !r1.is_ready() {
            warn!("CMD17({:#010x}) got {:#04x}", arg, r1.0);
            return Err(r1.error());
        }
        self.wait_data_token()
    }

    fn wait_data_token(&mut self) -> Result<(), MciError> {
        let mut token = BLOCK_READ_PENDING;
        for _ in 0..DATA_TOKEN_POLL_BYTES {
            token = self.bus.exchange(0xFF)?;
            if token != BLOCK_READ_PENDING {
                break;
            }
        }
        match token {
            BLOCK_READ_DATA_TOKEN => Ok(()),
            BLOCK_READ_PENDING => {
                warn!("No data token after {} bytes", DATA_TOKEN_POLL_BYTES);
                Err(MciError::DataError(CommandOrDataError::Timeout))
            }
            _ => {
                warn!("Unexpected data token {:#04x}", token);
                Err(MciError::ReadError)
            }
        }
    }
}
