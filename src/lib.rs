#![cfg_attr(not(test), no_std)]
pub mod bus;
pub mod card;
pub mod command_arguments;
pub mod commands;
pub mod controller;
pub mod registers;
pub mod response;

pub use bus::spi::bus::SpiBus;
pub use bus::Bus;
pub use card::{CardType, CardVersion, DiskStatus};
pub use controller::Controller;
