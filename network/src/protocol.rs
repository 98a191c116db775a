/// First byte of every frame on the event socket.
pub const FRAME_MAGIC: u8 = 0xaa;
/// Magic byte plus a big-endian `u16` body length.
pub const HEADER_SIZE: usize = 3;
pub const MAX_BODY_LEN: usize = u16::MAX as usize;
