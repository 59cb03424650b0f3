mod command;
mod controller;
mod read;
mod sdcard;

pub use controller::Controller;
