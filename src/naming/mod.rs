pub mod namer;
pub mod sequencer;

pub use namer::{sanitize, CoverSlot, OutputLayout};
pub use sequencer::{front_index_number, printed_page_number, PartSequence};
