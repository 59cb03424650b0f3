use bit_field::BitField;

/// Operation conditions register
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OcrRegister {
    pub val: u32,
}

impl From<[u8; 4]> for OcrRegister {
    /// OCR is sent MSB first
    fn from(bytes: [u8; 4]) -> Self {
        Self { val: u32::from_be_bytes(bytes) }
    }
}

impl OcrRegister {
    /// Card capacity status, valid once powered up. Set for SDHC/SDXC
    pub fn card_capacity_status(&self) -> bool {
        self.val.get_bit(30)
    }
}
