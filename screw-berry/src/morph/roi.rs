use super::edt::DistanceMap;
use crate::{Idx2d, Idx3d, LabelVolume, MorphError, MorphResult};
use ndarray::{Array3, ArrayView2, ArrayView3, ArrayViewMut2, Axis, Zip};

/// 将以物理单位给出的 ROI 半径换算为像素个数 (四舍六入五成双).
///
/// `roi_size` 与 `pixel_size` 单位相同 (通常为微米).
#[inline]
pub fn radius_in_pixels(roi_size: f64, pixel_size: f64) -> f64 {
    (roi_size / pixel_size).round_ties_even()
}

/// 检查 ROI 参数是否合法.
fn check_args(roi_size: f64, pixel_size: f64) -> MorphResult<()> {
    if !(pixel_size.is_finite() && pixel_size > 0.0) {
        return Err(MorphError::InvalidCalibration("pixel size must be positive"));
    }
    if !(roi_size.is_finite() && roi_size >= 0.0) {
        return Err(MorphError::InvalidCalibration("roi size must be non-negative"));
    }
    Ok(())
}

/// 根据一层参考切片计算这一层的掩膜.
fn fill_layer<F>(
    dm: &mut DistanceMap,
    reference: ArrayView2<u8>,
    mut mask: ArrayViewMut2<bool>,
    radius2: f64,
    is_structure: &F,
) -> MorphResult<()>
where
    F: Fn(u8) -> bool,
{
    let dist2 = dm.compute(reference, is_structure)?;
    Zip::from(&mut mask)
        .and(dist2)
        .for_each(|m, &d| *m = d < radius2);
    Ok(())
}

/// 感兴趣区域 (ROI) 掩膜.
///
/// 体素属于 ROI, 当且仅当它到参考结构的 **同层** 欧氏距离小于 ROI 半径.
/// 每一层独立计算二维距离变换, 这是对真正 3D 距离变换的有意简化.
///
/// 掩膜只依赖参考体数据, 因此对同一目标重复施加同一掩膜结果不变.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiMask {
    data: Array3<bool>,
}

impl RoiMask {
    /// 以 `reference` 中所有非零体素为参考结构构建掩膜.
    ///
    /// `roi_size` 与 `pixel_size` 单位相同. 阈值为 `round(roi_size / pixel_size)` 个像素,
    /// 因此 `roi_size == 0` 时掩膜为空集.
    #[inline]
    pub fn build(reference: &LabelVolume, roi_size: f64, pixel_size: f64) -> MorphResult<Self> {
        Self::build_with(reference, roi_size, pixel_size, |p| p != 0)
    }

    /// 以 `reference` 中所有满足 `is_structure` 的体素为参考结构构建掩膜.
    pub fn build_with<F>(
        reference: &LabelVolume,
        roi_size: f64,
        pixel_size: f64,
        is_structure: F,
    ) -> MorphResult<Self>
    where
        F: Fn(u8) -> bool,
    {
        check_args(roi_size, pixel_size)?;
        let radius = radius_in_pixels(roi_size, pixel_size);
        let mut dm = DistanceMap::new(reference.slice_shape());
        let mut data = Array3::from_elem(reference.shape(), false);

        for (z, (layer, mask)) in reference
            .data()
            .axis_iter(Axis(0))
            .zip(data.axis_iter_mut(Axis(0)))
            .enumerate()
        {
            fill_layer(&mut dm, layer, mask, radius * radius, &is_structure)
                .map_err(|e| e.at_slice(z))?;
        }

        let ans = Self { data };
        log::debug!(
            "roi mask: radius {radius} px, {} of {} voxels included",
            ans.count(),
            ans.size()
        );
        Ok(ans)
    }

    /// 掩膜形状 (z, H, W).
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 水平切片形状 (H, W).
    #[inline]
    pub fn slice_shape(&self) -> Idx2d {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// ROI 内的体素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|m| **m).count()
    }

    /// `pos` 是否位于 ROI 内. 越界时 panic.
    #[inline]
    pub fn contains(&self, pos: Idx3d) -> bool {
        self.data[pos]
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<bool> {
        self.data.view()
    }

    /// 将 `target` 中位于 ROI 之外的体素改写为 `fill`, ROI 内的体素保持不变.
    /// 返回新的体数据, `target` 不会被修改.
    ///
    /// `target` 与掩膜形状不一致时返回 `Err(ShapeMismatch)`.
    pub fn apply(&self, target: &LabelVolume, fill: u8) -> MorphResult<LabelVolume> {
        if target.shape() != self.shape() {
            return Err(MorphError::ShapeMismatch {
                expected: self.shape(),
                found: target.shape(),
            });
        }
        let data = Zip::from(target.data())
            .and(&self.data)
            .map_collect(|&p, &m| if m { p } else { fill });
        Ok(LabelVolume::new(data))
    }
}

/// 以 `reference` 的非零体素为参考结构, 将 `target` 中 ROI 之外的体素改写为 `fill`.
///
/// 等价于 `RoiMask::build(reference, roi_size, pixel_size)?.apply(target, fill)`.
pub fn mask_roi(
    reference: &LabelVolume,
    target: &LabelVolume,
    roi_size: f64,
    pixel_size: f64,
    fill: u8,
) -> MorphResult<LabelVolume> {
    if reference.shape() != target.shape() {
        return Err(MorphError::ShapeMismatch {
            expected: reference.shape(),
            found: target.shape(),
        });
    }
    RoiMask::build(reference, roi_size, pixel_size)?.apply(target, fill)
}

#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

/// 并发操作部分
#[cfg(feature = "rayon")]
impl RoiMask {
    /// 借助 `rayon`, 按层并行构建掩膜. 结果与 [`Self::build_with`] 完全一致.
    pub fn par_build_with<F>(
        reference: &LabelVolume,
        roi_size: f64,
        pixel_size: f64,
        is_structure: F,
    ) -> MorphResult<Self>
    where
        F: Fn(u8) -> bool + Sync + Send,
    {
        check_args(roi_size, pixel_size)?;
        let radius = radius_in_pixels(roi_size, pixel_size);
        let slice_shape = reference.slice_shape();
        let mut data = Array3::from_elem(reference.shape(), false);

        reference
            .data()
            .axis_iter(Axis(0))
            .into_par_iter()
            .zip(data.axis_iter_mut(Axis(0)).into_par_iter())
            .enumerate()
            .try_for_each_init(
                || DistanceMap::new(slice_shape),
                |dm, (z, (layer, mask))| {
                    fill_layer(dm, layer, mask, radius * radius, &is_structure)
                        .map_err(|e| e.at_slice(z))
                },
            )?;
        Ok(Self { data })
    }
}

#[cfg(test)]
mod tests {
    use super::{mask_roi, radius_in_pixels, RoiMask};
    use crate::{LabelVolume, MorphError};
    use ndarray::{s, Array3};

    /// 11x11 的两层参考, 每层中心一个非零像素.
    fn centered_reference() -> LabelVolume {
        let mut data = Array3::zeros((2, 11, 11));
        data[(0, 5, 5)] = 2u8;
        data[(1, 5, 5)] = 2u8;
        LabelVolume::new(data)
    }

    #[test]
    fn test_radius_rounding() {
        assert_eq!(radius_in_pixels(1000.0, 10.0), 100.0);
        assert_eq!(radius_in_pixels(25.0, 10.0), 2.0);
        assert_eq!(radius_in_pixels(35.0, 10.0), 4.0);
        assert_eq!(radius_in_pixels(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_zero_radius_is_empty() {
        let mask = RoiMask::build(&centered_reference(), 0.0, 10.0).unwrap();
        assert_eq!(mask.count(), 0);

        // 不到半个像素同样舍入为 0.
        let mask = RoiMask::build(&centered_reference(), 4.0, 10.0).unwrap();
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_disk() {
        // 半径 3 像素: 距离平方 < 9 的格点.
        let mask = RoiMask::build(&centered_reference(), 30.0, 10.0).unwrap();
        let per_layer = (-3i32..=3)
            .flat_map(|a| (-3i32..=3).map(move |b| a * a + b * b))
            .filter(|d2| *d2 < 9)
            .count();
        assert_eq!(mask.count(), 2 * per_layer);
        assert!(mask.contains((0, 5, 5)));
        assert!(mask.contains((1, 5, 7)));
        assert!(!mask.contains((1, 5, 8)));
    }

    #[test]
    fn test_apply_and_idempotent() {
        let reference = centered_reference();
        let target = LabelVolume::from_elem((2, 11, 11), 4);
        let once = mask_roi(&reference, &target, 20.0, 10.0, 1).unwrap();
        let twice = mask_roi(&reference, &once, 20.0, 10.0, 1).unwrap();
        assert_eq!(once, twice);
        assert_eq!(target, LabelVolume::from_elem((2, 11, 11), 4));
        assert_eq!(once[(0, 0, 0)], 1);
        assert_eq!(once[(0, 5, 5)], 4);
        assert_eq!(once.count(4) + once.count(1), once.size());
    }

    #[test]
    fn test_layer_without_structure() {
        let mut data = Array3::zeros((2, 6, 6));
        data.slice_mut(s![0, 2..4, 2..4]).fill(2u8);
        let mask = RoiMask::build(&LabelVolume::new(data), 100.0, 10.0).unwrap();
        assert_eq!(mask.data().index_axis(ndarray::Axis(0), 0).iter().filter(|m| **m).count(), 36);
        assert!(mask.data().index_axis(ndarray::Axis(0), 1).iter().all(|m| !*m));
    }

    #[test]
    fn test_invalid_args() {
        let reference = centered_reference();
        assert!(matches!(
            RoiMask::build(&reference, 10.0, 0.0),
            Err(MorphError::InvalidCalibration(_))
        ));
        assert!(matches!(
            RoiMask::build(&reference, -1.0, 10.0),
            Err(MorphError::InvalidCalibration(_))
        ));
        let other = LabelVolume::from_elem((3, 11, 11), 0);
        assert!(matches!(
            mask_roi(&reference, &other, 10.0, 10.0, 0),
            Err(MorphError::ShapeMismatch { .. })
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_build_matches_sequential() {
        let reference = LabelVolume::new(Array3::from_shape_fn((5, 9, 12), |(z, h, w)| {
            u8::from((z + h * 3 + w * 5) % 13 == 0)
        }));
        let seq = RoiMask::build_with(&reference, 25.0, 10.0, |p| p != 0).unwrap();
        let par = RoiMask::par_build_with(&reference, 25.0, 10.0, |p| p != 0).unwrap();
        assert_eq!(seq, par);
    }
}
