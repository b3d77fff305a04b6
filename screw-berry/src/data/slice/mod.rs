//! 标签切片对象的操作.

mod core;
mod save;

pub use core::{LabelSlice, LabelSliceMut, OwnedLabelSlice};

pub use save::ImgWriteRaw;
