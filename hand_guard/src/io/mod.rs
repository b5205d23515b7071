pub mod sink;
pub mod source;

pub use sink::{ConsoleSink, DisplaySink, select_sink};
pub use source::{FrameSequenceSource, VideoSource};
