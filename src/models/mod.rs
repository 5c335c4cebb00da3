mod preview;

pub use preview::{PageMetadata, Preview, PreviewRequest, PreviewType};
