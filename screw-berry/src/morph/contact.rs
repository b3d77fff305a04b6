//! 标签对接触计数.
//!
//! 一对接触是指沿某个坐标轴方向相邻的两个体素, 其中一个为 `label1`, 另一个为 `label2`.
//! 每个方向只比较 "正向" 相邻对 `(v, v + 1)`, 但同时检查两种标签顺序,
//! 因此 `(label1, label2)` 与 `(label2, label1)` 都被计入, 且不会重复.
//!
//! 边界处理: 数组沿比较方向收缩 1, 最后一个体素没有正向邻居. 不做周期延拓或填充.
//!
//! # 单位
//!
//! 3D 计数等于两种材料之间体素面 (face) 的个数. 乘以像素面积即得到以面片近似的接触面积.
//! 当 `label1 == label2` 时, 同一对会被两种顺序各计一次.

use crate::data::Histogram;
use crate::{MorphError, MorphResult};
use ndarray::{ArrayView, ArrayView2, ArrayView3, Axis, Dimension, Slice, Zip};

/// 两个标签都必须出现在 `hist` 中, 否则返回 `Err(InvalidLabel)`.
#[inline]
fn ensure_present(hist: &Histogram, label1: u8, label2: u8) -> MorphResult<()> {
    if hist.contains(label1) && hist.contains(label2) {
        Ok(())
    } else {
        Err(MorphError::InvalidLabel { label1, label2 })
    }
}

/// 沿 `axis` 方向统计正向相邻的 `label1`-`label2` 对个数 (两种顺序之和).
fn axis_pairs<D: Dimension>(data: &ArrayView<u8, D>, axis: Axis, label1: u8, label2: u8) -> usize {
    let len = data.len_of(axis);
    if len < 2 {
        return 0;
    }
    let head = data.slice_axis(axis, Slice::from(..len - 1));
    let tail = data.slice_axis(axis, Slice::from(1..));
    Zip::from(head).and(tail).fold(0usize, |acc, &p, &q| {
        acc + usize::from(p == label1 && q == label2) + usize::from(p == label2 && q == label1)
    })
}

/// 沿 z, H, W 三个方向统计 `label1`-`label2` 相邻体素对的个数.
///
/// 两个标签中至少一个不存在于 `data` 时返回 `Err(InvalidLabel)`.
pub fn contact_3d(data: ArrayView3<u8>, label1: u8, label2: u8) -> MorphResult<usize> {
    ensure_present(&data.iter().collect::<Histogram>(), label1, label2)?;
    let ans: usize = (0..3)
        .map(|ax| axis_pairs(&data, Axis(ax), label1, label2))
        .sum();
    log::debug!("3d contact ({label1}, {label2}): {ans}");
    Ok(ans)
}

/// 仅在图像平面内 (H, W 两个方向) 统计 `label1`-`label2` 相邻像素对的个数.
///
/// 两个标签中至少一个不存在于 `data` 时返回 `Err(InvalidLabel)`.
pub fn contact_2d(data: ArrayView2<u8>, label1: u8, label2: u8) -> MorphResult<usize> {
    ensure_present(&data.iter().collect::<Histogram>(), label1, label2)?;
    Ok((0..2)
        .map(|ax| axis_pairs(&data, Axis(ax), label1, label2))
        .sum())
}

/// 将 3D 体数据的每一层视为独立的 2D 接触区域, 只统计层内 (H, W 方向) 的相邻对,
/// 不统计跨层 (z 方向) 的相邻对. 结果等于逐层 [`contact_2d`] 之和.
///
/// 标签存在性在整个体数据上检查.
pub fn contact_layered(data: ArrayView3<u8>, label1: u8, label2: u8) -> MorphResult<usize> {
    ensure_present(&data.iter().collect::<Histogram>(), label1, label2)?;
    Ok((1..3)
        .map(|ax| axis_pairs(&data, Axis(ax), label1, label2))
        .sum())
}
