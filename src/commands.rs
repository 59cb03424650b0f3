/// SPI mode command, `app` marks the commands that must be prefixed by CMD55
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    index: u8,
    app: bool,
}

impl Command {
    pub const fn new(index: u8) -> Self {
        Self { index, app: false }
    }

    pub const fn app(index: u8) -> Self {
        Self { index, app: true }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn is_app(&self) -> bool {
        self.app
    }

    /// Build the 6 bytes frame: start + index, argument MSB first, CRC7 + stop
    pub fn frame(&self, argument: u32) -> [u8; 6] {
        let arg = argument.to_be_bytes();
        let crc = match self.index {
            0 => CMD0_CRC,
            8 => CMD8_CRC,
            // Ignored by cards as long as CRC checking stays off
            _ => 0x01,
        };
        [0x40 | self.index, arg[0], arg[1], arg[2], arg[3], crc]
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command.index
    }
}

/// GO_IDLE_STATE
pub const SDMMC_CMD0_GO_IDLE_STATE: Command = Command::new(0);
/// SEND_OP_COND, MMC only
pub const MMC_CMD1_SEND_OP_COND: Command = Command::new(1);
/// SEND_IF_COND
pub const SD_CMD8_SEND_IF_COND: Command = Command::new(8);
/// SET_BLOCKLEN
pub const SDMMC_CMD16_SET_BLOCKLEN: Command = Command::new(16);
/// READ_SINGLE_BLOCK
pub const SDMMC_CMD17_READ_SINGLE_BLOCK: Command = Command::new(17);
/// APP_CMD
pub const SDMMC_CMD55_APP_CMD: Command = Command::new(55);
/// READ_OCR
pub const SDMMC_CMD58_READ_OCR: Command = Command::new(58);
/// SD_SEND_OP_COND
pub const SD_ACMD41_SD_SEND_OP_COND: Command = Command::app(41);

/// CMD8 is only ever sent with this argument: 2.7-3.6V, check pattern 0xAA
pub const SD_CMD8_ARGUMENT: u32 = 0x1AA;

/// CRC of CMD0(0), the card still checks CRC before entering SPI mode
pub const CMD0_CRC: u8 = crc7(&[0x40, 0, 0, 0, 0]);
/// CRC of CMD8(0x1AA), checked by SD v2 cards regardless of CRC mode
pub const CMD8_CRC: u8 = crc7(&[
    0x48,
    (SD_CMD8_ARGUMENT >> 24) as u8,
    (SD_CMD8_ARGUMENT >> 16) as u8,
    (SD_CMD8_ARGUMENT >> 8) as u8,
    SD_CMD8_ARGUMENT as u8,
]);

/// CRC7 of a command, shifted and with the end bit set
pub const fn crc7(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        let mut bit = 0u32;
        while bit < 8 {
            crc <<= 1;
            if (((b << bit) & 0x80) ^ (crc & 0x80)) != 0 {
                crc ^= 0x09;
            }
            bit += 1;
        }
        i += 1;
    }
    (crc << 1) | 1
}
