use embedded_error::mci::{CommandOrDataError, MciError};

pub trait Field: Into<u8> {}

pub trait BitField<F: Field>: Copy + Into<u8> {
    fn has(&self, field: F) -> bool {
        let value: u8 = (*self).into();
        value & (1 << field.into()) > 0
    }

    fn no(&self, field: F) -> Option<()> {
        if !self.has(field) {
            Some(())
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug)]
#[allow(dead_code)]
pub enum R1ResponseField {
    Idle = 0,
    EraseReset,
    IllegalCommand,
    CommandCRC,
    EraseSequence,
    Address,
    Parameter,
    /// Start bit, a response has it cleared
    Busy,
}

impl From<R1ResponseField> for u8 {
    fn from(field: R1ResponseField) -> u8 {
        field as u8
    }
}

impl Field for R1ResponseField {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct R1Response(pub u8);

/// Card left idle state and reports no error
pub const R1_READY_STATE: u8 = 0x00;
/// Card is in idle state and reports no error
pub const R1_IDLE_STATE: u8 = 0x01;

impl From<u8> for R1Response {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<R1Response> for u8 {
    fn from(response: R1Response) -> u8 {
        response.0
    }
}

impl BitField<R1ResponseField> for R1Response {}

impl R1Response {
    pub fn is_ready(self) -> bool {
        self.0 == R1_READY_STATE
    }

    pub fn is_idle(self) -> bool {
        self.0 == R1_IDLE_STATE
    }

    /// Anything beyond the idle flag
    pub fn is_error(self) -> bool {
        self.0 > R1_IDLE_STATE
    }

    /// Error matching a rejected command
    pub fn error(self) -> MciError {
        if self.has(R1ResponseField::Busy) {
            return MciError::CommandError(CommandOrDataError::Timeout);
        }
        if self.has(R1ResponseField::CommandCRC) {
            return MciError::CommandError(CommandOrDataError::Crc);
        }
        if self.has(R1ResponseField::IllegalCommand) {
            return MciError::CommandError(CommandOrDataError::Index);
        }
        MciError::UnusableCard
    }
}

/// Start block token for single block read
pub const BLOCK_READ_DATA_TOKEN: u8 = 0xFE;
/// Bus idle, card still looking for the data
pub const BLOCK_READ_PENDING: u8 = 0xFF;
