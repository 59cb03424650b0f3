use embedded_error::mci::MciError;
use embedded_error::ImplError;
use log::{debug, warn};

use crate::bus::{Bus, SD_MMC_BLOCK_SIZE};
use crate::card::CardType;
use crate::command_arguments::{Acmd41, Cmd8};
use crate::commands::{
    Command, MMC_CMD1_SEND_OP_COND, SDMMC_CMD0_GO_IDLE_STATE, SDMMC_CMD16_SET_BLOCKLEN,
    SDMMC_CMD58_READ_OCR, SD_ACMD41_SD_SEND_OP_COND, SD_CMD8_SEND_IF_COND,
};
use crate::registers::ocr::OcrRegister;
use crate::response::R1Response;

use super::controller::{
    Controller, IDLE_EXIT_RETRIES, WARM_UP_DESELECTED_BYTES, WARM_UP_SELECTED_BYTES,
};

impl<BUS: Bus> Controller<BUS> {
    /// Reset the card, find out its type and leave it ready for single block reads.
    ///
    /// Any previous classification is dropped first, so a failed attempt leaves the
    /// controller not initialized. The bus is released whatever the outcome.
    pub fn initialize(&mut self) -> Result<CardType, MciError> {
        self.card_type = None;
        let installed = self.install();
        let released = self.release();
        let card_type = installed.and_then(|card_type| released.map(|_| card_type))?;
        debug!("Card type: {}", card_type);
        self.card_type = Some(card_type);
        Ok(card_type)
    }

    fn install(&mut self) -> Result<CardType, MciError> {
        // Supply clock cycles before the first command, 74 at least
        self.bus.deselect()?;
        self.dummy_clocks(WARM_UP_DESELECTED_BYTES)?;
        self.bus.select()?;
        self.dummy_clocks(WARM_UP_SELECTED_BYTES)?;

        let r1 = R1Response(self.send_command(SDMMC_CMD0_GO_IDLE_STATE, 0)?);
        if !r1.is_idle() {
            warn!("CMD0 got {:#04x}, card did not enter idle state", r1.0);
            return Err(r1.error());
        }

        let mut cmd8 = Cmd8::default();
        cmd8.set_high_voltage(true).set_check_pattern(0xAA);
        if R1Response(self.send_command(SD_CMD8_SEND_IF_COND, cmd8.val)?).is_idle() {
            self.install_sd_v2(cmd8)
        } else {
            self.install_sd_v1_or_mmc()
        }
    }

    fn install_sd_v2(&mut self, cmd8: Cmd8) -> Result<CardType, MciError> {
        let r7 = self.read_u32_bytes()?;
        if !cmd8.echoed_by(r7) {
            warn!("CMD8 echoed {:02x?}, voltage range or pattern not accepted", r7);
            return Err(MciError::Impl(ImplError::InvalidConfiguration));
        }

        let mut acmd41 = Acmd41::default();
        acmd41.set_high_capacity_support(true);
        if !self.wait_idle_exit(SD_ACMD41_SD_SEND_OP_COND, acmd41.val)? {
            warn!("SDv2 card still idle after {} ACMD41", IDLE_EXIT_RETRIES);
            return Err(MciError::Impl(ImplError::TimedOut));
        }

        let r1 = R1Response(self.send_command(SDMMC_CMD58_READ_OCR, 0)?);
        if !r1.is_ready() {
            warn!("CMD58 got {:#04x}", r1.0);
            return Err(r1.error());
        }
        let ocr = OcrRegister::from(self.read_u32_bytes()?);
        // Block length is fixed to 512 bytes on SDv2, no CMD16 needed
        Ok(CardType::sd2(ocr.card_capacity_status()))
    }

    fn install_sd_v1_or_mmc(&mut self) -> Result<CardType, MciError> {
        let (card_type, command) =
            if R1Response(self.send_command(SD_ACMD41_SD_SEND_OP_COND, 0)?).is_error() {
                (CardType::mmc(), MMC_CMD1_SEND_OP_COND)
            } else {
                (CardType::sd1(), SD_ACMD41_SD_SEND_OP_COND)
            };
        debug!("Provisional card type: {}", card_type);

        if !self.wait_idle_exit(command, 0)? {
            warn!(
                "{} card still idle after {} CMD{}",
                card_type,
                IDLE_EXIT_RETRIES,
                command.index()
            );
            return Err(MciError::Impl(ImplError::TimedOut));
        }

        let block_length = SD_MMC_BLOCK_SIZE as u32;
        let r1 = R1Response(self.send_command(SDMMC_CMD16_SET_BLOCKLEN, block_length)?);
        if !r1.is_ready() {
            warn!("CMD16 got {:#04x}, block length not set", r1.0);
            return Err(r1.error());
        }
        Ok(card_type)
    }

    /// Repeat `command` until the card leaves idle state.
    /// False when it is still idle after the last retry
    fn wait_idle_exit(&mut self, command: Command, arg: u32) -> Result<bool, MciError> {
        for _ in 0..IDLE_EXIT_RETRIES {
            if R1Response(self.send_command(command, arg)?).is_ready() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Trailing 4 bytes of R3/R7, MSB first
    fn read_u32_bytes(&mut self) -> Result<[u8; 4], MciError> {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = self.bus.exchange(0xFF)?;
        }
        Ok(bytes)
    }
}
