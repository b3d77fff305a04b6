//! 形态学计算的运行时错误.

use crate::{Idx2d, Idx3d};
use thiserror::Error;

/// 形态学定量 (体素计数, 接触计数, ROI 掩膜, 派生量) 的运行时错误.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MorphError {
    /// 接触计数时, 两个标签中至少一个不存在于体数据中.
    #[error("one or more labels do not exist: `{label1}`, `{label2}`")]
    InvalidLabel {
        /// 第一个标签.
        label1: u8,
        /// 第二个标签.
        label2: u8,
    },

    /// 调用方要求标签必须存在, 但体数据中没有该标签.
    #[error("label `{0}` not found")]
    LabelNotFound(u8),

    /// 体数据中出现了标签字典之外的值.
    #[error("voxel value `{0}` is not a code of the label dictionary")]
    UnknownLabel(u8),

    /// 标签字典中存在重复编码.
    #[error("label code `{0}` is assigned to more than one role")]
    DuplicateCode(u8),

    /// 3D 形状不一致.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// 期望的形状.
        expected: Idx3d,
        /// 实际的形状.
        found: Idx3d,
    },

    /// 2D 切片形状不一致.
    #[error("slice shape mismatch: expected {expected:?}, found {found:?}")]
    SliceShapeMismatch {
        /// 期望的形状.
        expected: Idx2d,
        /// 实际的形状.
        found: Idx2d,
    },

    /// 分母为零. 参数为分母所代表的量.
    #[error("division by zero: {0} is zero")]
    DivisionByZero(&'static str),

    /// 没有任何输入切片.
    #[error("empty input: no slices to stack")]
    EmptyInput,

    /// 标定参数非法 (像素尺寸, ROI 半径, 图像尺寸等).
    #[error("invalid calibration: {0}")]
    InvalidCalibration(&'static str),

    /// 构建配置时缺少必填字段.
    #[error("missing configuration field `{0}`")]
    MissingConfig(&'static str),

    /// 逐层计算在第 `index` 层失败.
    #[error("slice {index}: {source}")]
    AtSlice {
        /// 水平切片索引.
        index: usize,
        /// 底层错误.
        source: Box<MorphError>,
    },
}

impl MorphError {
    /// 将错误包装为第 `index` 层的错误.
    #[inline]
    pub fn at_slice(self, index: usize) -> Self {
        Self::AtSlice {
            index,
            source: Box::new(self),
        }
    }
}

/// 形态学计算运行时结果.
pub type MorphResult<T> = Result<T, MorphError>;

/// 计算 `num / den`. 如果 `den` 为零则返回 `Err(DivisionByZero(what))`,
/// 从不产生 inf 或 NaN.
#[inline]
pub(crate) fn checked_div(num: f64, den: f64, what: &'static str) -> MorphResult<f64> {
    if den == 0.0 {
        return Err(MorphError::DivisionByZero(what));
    }
    let ans = num / den;
    debug_assert!(ans.is_finite());
    Ok(ans)
}
