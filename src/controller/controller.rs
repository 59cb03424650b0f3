use embedded_error::mci::MciError;

use crate::bus::Bus;
use crate::card::{CardType, DiskStatus};

/// Dummy bytes clocked with the card deselected, 80 cycles at least
pub(crate) const WARM_UP_DESELECTED_BYTES: usize = 10;
/// Dummy bytes clocked with the card selected before the first command
pub(crate) const WARM_UP_SELECTED_BYTES: usize = 600;
/// Bytes polled for a command response, Ncr
pub(crate) const RESPONSE_POLL_BYTES: usize = 10;
/// Idle exit retries (ACMD41 / CMD1)
pub(crate) const IDLE_EXIT_RETRIES: u32 = 25_000;
/// Bytes polled for the read data token, about 100ms on the reference clock
pub(crate) const DATA_TOKEN_POLL_BYTES: u32 = 30_000;

/// Single card on a dedicated bus
pub struct Controller<BUS> {
    pub(crate) bus: BUS,
    /// Cleared on every initialization attempt, set on success only
    pub(crate) card_type: Option<CardType>,
}

impl<BUS: Bus> Controller<BUS> {
    pub fn new(bus: BUS) -> Self {
        Controller { bus, card_type: None }
    }

    pub fn status(&self) -> DiskStatus {
        self.card_type.into()
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.card_type
    }

    pub fn free(self) -> BUS {
        self.bus
    }

    /// Deselect the card then clock one byte so that it releases DO
    pub(crate) fn release(&mut self) -> Result<(), MciError> {
        self.bus.deselect()?;
        self.bus.exchange(0xFF)?;
        Ok(())
    }

    pub(crate) fn dummy_clocks(&mut self, bytes: usize) -> Result<(), MciError> {
        for _ in 0..bytes {
            self.bus.exchange(0xFF)?;
        }
        Ok(())
    }
}
