pub mod drag;
pub mod range;
pub mod scroll;

pub use drag::{
    CommitRequest, DragEngine, DragMode, DragSession, DragState, DragTarget, DraftOverride, PointerCapture,
};
pub use range::{RangeController, Shift};
pub use scroll::ScrollSync;
