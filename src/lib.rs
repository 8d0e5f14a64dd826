//! Offline converters from Amstrad CPC graphics (Mode 0 dumps and emulator screenshots)
//! to PNG assets and per-room collision data.

pub mod cli;
pub mod collision;
pub mod common;
pub mod crop;
pub mod doors;
pub mod helpers;
pub mod mode0;
pub mod persist;
pub mod placeholder;
pub mod scan;
pub mod screenshot;
pub mod state;
pub mod tileset;
