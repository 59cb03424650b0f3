use bit_field::BitField;

/// CMD8 argument: supplied voltage and check pattern, echoed back in R7
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cmd8 {
    pub val: u32,
}

impl Cmd8 {
    /// 2.7-3.6V
    pub fn set_high_voltage(&mut self, high_voltage: bool) -> &mut Self {
        self.val.set_bits(8..12, high_voltage as u32);
        self
    }

    pub fn set_check_pattern(&mut self, pattern: u8) -> &mut Self {
        self.val.set_bits(0..8, pattern as u32);
        self
    }

    /// Whether the trailing 4 bytes of R7 accepted the voltage and echoed the pattern
    pub fn echoed_by(&self, r7: [u8; 4]) -> bool {
        u32::from_be_bytes(r7).get_bits(0..16) == self.val.get_bits(0..16)
    }
}

/// ACMD41 argument
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Acmd41 {
    pub val: u32,
}

impl Acmd41 {
    /// HCS, host supports SDHC/SDXC
    pub fn set_high_capacity_support(&mut self, hcs: bool) -> &mut Self {
        self.val.set_bit(30, hcs);
        self
    }
}
