use core::fmt;

/// Protocol generation of the attached card
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardVersion {
    /// MMC version 3
    Mmc,
    /// SD version 1.x, standard capacity
    Sd1,
    /// SD version 2.0 or later
    Sd2,
}

/// Card classification, decided once per initialization
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardType {
    version: CardVersion,
    block_addressed: bool,
}

impl CardType {
    pub const fn mmc() -> Self {
        Self { version: CardVersion::Mmc, block_addressed: false }
    }

    pub const fn sd1() -> Self {
        Self { version: CardVersion::Sd1, block_addressed: false }
    }

    /// SDHC and SDXC cards (CCS=1) are block addressed
    pub const fn sd2(block_addressed: bool) -> Self {
        Self { version: CardVersion::Sd2, block_addressed }
    }

    pub fn version(&self) -> CardVersion {
        self.version
    }

    pub fn block_addressed(&self) -> bool {
        self.block_addressed
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.version, self.block_addressed) {
            (CardVersion::Mmc, _) => write!(f, "MMCv3"),
            (CardVersion::Sd1, _) => write!(f, "SDv1"),
            (CardVersion::Sd2, false) => write!(f, "SDv2"),
            (CardVersion::Sd2, true) => write!(f, "SDv2 (block addressed)"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiskStatus {
    Ready,
    NotInitialized,
}

impl From<Option<CardType>> for DiskStatus {
    fn from(card_type: Option<CardType>) -> Self {
        match card_type {
            Some(_) => DiskStatus::Ready,
            None => DiskStatus::NotInitialized,
        }
    }
}
