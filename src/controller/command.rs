use embedded_error::mci::MciError;
use log::trace;

use crate::bus::Bus;
use crate::commands::{Command, SDMMC_CMD55_APP_CMD};
use crate::response::{BitField, R1Response, R1ResponseField};

use super::controller::{Controller, RESPONSE_POLL_BYTES};

impl<BUS: Bus> Controller<BUS> {
    /// Send a command and return its R1 response.
    /// Application commands are preceded by CMD55, whose response is returned as is
    /// when it reports an error.
    /// A response with the busy bit set means the card never answered.
    pub(crate) fn send_command(&mut self, command: Command, arg: u32) -> Result<u8, MciError> {
        if command.is_app() {
            let r1 = R1Response(self.transfer_command(SDMMC_CMD55_APP_CMD, 0)?);
            if r1.is_error() {
                trace!("CMD55 rejected with {:#04x}, ACMD{} not sent", r1.0, command.index());
                return Ok(r1.0);
            }
        }
        self.transfer_command(command, arg)
    }

    fn transfer_command(&mut self, command: Command, arg: u32) -> Result<u8, MciError> {
        // Bracket each command so the card sees a clean boundary
        self.bus.deselect()?;
        self.bus.exchange(0xFF)?;
        self.bus.select()?;
        self.bus.exchange(0xFF)?;

        self.bus.transmit(&command.frame(arg))?;

        let mut r1 = R1Response(0xFF);
        for _ in 0..RESPONSE_POLL_BYTES {
            r1 = R1Response(self.bus.exchange(0xFF)?);
            if r1.no(R1ResponseField::Busy).is_some() {
                break;
            }
        }
        trace!("CMD{}({:#010x}) -> {:#04x}", command.index(), arg, r1.0);
        Ok(r1.0)
    }
}
