//! 二维精确欧氏距离变换.
//!
//! 采用 Felzenszwalb & Huttenlocher 的可分离算法: 先沿 H 方向, 再沿 W 方向,
//! 对每一行/列求一维下包络. 复杂度与像素个数成线性关系.

use crate::{Idx2d, MorphError, MorphResult};
use ndarray::{Array2, ArrayView2, Axis, Zip};

/// 有限的 "无穷大". 使用真正的 `f64::INFINITY` 会在求交点时产生 `inf - inf`.
const FAR: f64 = 1e20;

/// 一维平方距离变换. `f` 为输入代价, 结果写入 `d`.
/// `v` 和 `z` 为工作缓冲区, 长度分别至少为 `n` 和 `n + 1`.
fn edt_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let parabola = |q: usize, p: usize| {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        let mut s = parabola(q, v[k]);
        // `z[0]` 为负无穷, 因此 `k` 不会下溢.
        while s <= z[k] {
            k -= 1;
            s = parabola(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, dq) in d.iter_mut().enumerate().take(n) {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let diff = q as f64 - v[k] as f64;
        *dq = diff * diff + f[v[k]];
    }
}

/// 固定尺寸的二维距离图, 以及计算过程所需的全部缓冲区.
///
/// 同一个 `DistanceMap` 可以在形状相同的所有切片之间复用, 避免重复分配.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    /// 到最近前景像素的欧氏距离的平方 (单位: 像素^2). 没有前景时为正无穷.
    dist2: Array2<f64>,
    f: Vec<f64>,
    d: Vec<f64>,
    v: Vec<usize>,
    z: Vec<f64>,
}

impl DistanceMap {
    /// 为形状为 `(h, w)` 的切片分配距离图.
    pub fn new((h, w): Idx2d) -> Self {
        let n = h.max(w);
        Self {
            dist2: Array2::from_elem((h, w), f64::INFINITY),
            f: vec![0.0; n],
            d: vec![0.0; n],
            v: vec![0; n],
            z: vec![0.0; n + 1],
        }
    }

    /// 距离图形状 (H, W).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.dist2.dim()
    }

    /// 计算 `slice` 中每个像素到最近的、满足 `is_feature` 的像素的欧氏距离的平方.
    ///
    /// 若切片内不存在这样的像素, 则所有距离为正无穷.
    /// 若 `slice` 形状与距离图不一致, 返回 `Err(SliceShapeMismatch)`.
    pub fn compute<F>(&mut self, slice: ArrayView2<u8>, is_feature: F) -> MorphResult<ArrayView2<f64>>
    where
        F: Fn(u8) -> bool,
    {
        if slice.dim() != self.shape() {
            return Err(MorphError::SliceShapeMismatch {
                expected: self.shape(),
                found: slice.dim(),
            });
        }

        let mut any = false;
        Zip::from(&mut self.dist2).and(slice).for_each(|d, &p| {
            if is_feature(p) {
                *d = 0.0;
                any = true;
            } else {
                *d = FAR;
            }
        });
        if !any {
            self.dist2.fill(f64::INFINITY);
            return Ok(self.dist2.view());
        }

        for axis in [Axis(0), Axis(1)] {
            for mut lane in self.dist2.lanes_mut(axis) {
                let n = lane.len();
                for (dst, src) in self.f.iter_mut().zip(lane.iter()) {
                    *dst = *src;
                }
                edt_1d(&self.f[..n], &mut self.d[..n], &mut self.v[..n], &mut self.z[..=n]);
                for (dst, src) in lane.iter_mut().zip(self.d.iter()) {
                    *dst = *src;
                }
            }
        }
        Ok(self.dist2.view())
    }

    /// 最近一次 [`Self::compute`] 得到的, 位置 `pos` 处的欧氏距离 (单位: 像素).
    #[inline]
    pub fn distance(&self, pos: Idx2d) -> f64 {
        self.dist2[pos].sqrt()
    }
}
