//! 通用常量.

/// 默认标签字典中, 背景的像素值.
pub const DEFAULT_BACKGROUND: u8 = 0;

/// 默认标签字典中, (降解后) 骨钉的像素值.
pub const DEFAULT_SCREW: u8 = 1;

/// 默认标签字典中, 参考扫描 (未降解) 骨钉的像素值.
pub const DEFAULT_SCREW_REF: u8 = 2;

/// 默认标签字典中, 降解层的像素值.
pub const DEFAULT_DEGRADATION_LAYER: u8 = 3;

/// 默认标签字典中, 骨组织的像素值.
pub const DEFAULT_BONE: u8 = 4;

/// BIC 计算所用的固定 ROI 半径 (单位: 微米).
pub const DEFAULT_ROI_SIZE_UM: f64 = 1000.0;

/// 一年的天数.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// 立方微米到立方毫米的换算因子.
pub const UM3_PER_MM3: f64 = 1e9;

/// 平方微米到平方毫米的换算因子.
pub const UM2_PER_MM2: f64 = 1e6;
