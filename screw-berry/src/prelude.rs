//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::data::slice::{ImgWriteRaw, LabelSlice, LabelSliceMut, OwnedLabelSlice};
pub use crate::data::{Histogram, LabelVolume};
pub use crate::error::{MorphError, MorphResult};

pub use crate::consts::{DEFAULT_ROI_SIZE_UM, DEFAULT_SCREW, DEFAULT_SCREW_REF};
pub use crate::label::{LabelDictionary, Role};

pub use crate::io::{home_dataset_dir_with, load_volume, LoadError};
pub use crate::morph::{contact_2d, contact_3d, mask_roi, RoiMask};
pub use crate::sample::{Calibration, Sample, SampleConfig, SliceSeries};
