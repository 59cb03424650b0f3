pub mod bus;
mod read;
