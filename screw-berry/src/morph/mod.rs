//! 体素级形态学计算: 标签接触计数, 欧氏距离变换与 ROI 掩膜.

pub mod contact;
mod edt;
mod roi;

pub use contact::{contact_2d, contact_3d, contact_layered};
pub use edt::DistanceMap;
pub use roi::{mask_roi, radius_in_pixels, RoiMask};
