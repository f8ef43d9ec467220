pub mod protocol;

pub use protocol::{pack_frame, FrameHeader, ProtocolLayout};
