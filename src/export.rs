/// PNG/JPEG encoding and the encoded payload type.
pub mod encode;
/// The three-tier degradation state machine.
pub mod fallback;
/// End-to-end export entry points and the thumbnail path.
pub mod pipeline;
