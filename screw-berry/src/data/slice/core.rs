use crate::data::{label_set, Histogram};
use crate::morph::contact;
use crate::{Idx2d, MorphResult};
use ndarray::iter::Iter;
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Ix2};
use std::ops::{Index, IndexMut};

/// 不可变、借用的二维水平标签切片.
pub struct LabelSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::LabelVolume`].
    ///
    /// 这里有意把代码写死为 `ArrayView` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayView2<'a, u8>,
}

impl Index<Idx2d> for LabelSlice<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 可变、借用的二维水平标签切片.
pub struct LabelSliceMut<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::LabelVolume`].
    data: ArrayViewMut2<'a, u8>,
}

impl Index<Idx2d> for LabelSliceMut<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for LabelSliceMut<'_> {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

/// label 不可变方法集合.
macro_rules! impl_label_slice_immut {
    ($life: lifetime, $slice: ty, $array: ty) => {
        /// 不可变方法集合.
        impl<$life> $slice {
            /// 直接初始化.
            #[inline]
            pub(crate) fn new(data: $array) -> Self {
                Self { data }
            }

            /// 获得 **底层** 数据的一份不可变 shallow copy.
            #[inline]
            pub fn array_view(&self) -> ArrayView2<u8> {
                self.data.view()
            }

            /// 获取可以迭代图像像素的迭代器.
            #[inline]
            pub fn iter(&self) -> Iter<'_, u8, Ix2> {
                self.data.iter()
            }

            /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
            #[inline]
            pub fn get(&self, pos: Idx2d) -> Option<&u8> {
                self.data.get(pos)
            }

            /// 图像的分辨率 (高, 宽).
            #[inline]
            pub fn shape(&self) -> Idx2d {
                self.data.dim()
            }

            /// 图像的像素个数.
            #[inline]
            pub fn size(&self) -> usize {
                let (h, w) = self.shape();
                h * w
            }

            /// 统计图像中值为 `label` 的像素总个数. 不存在时为 0.
            #[inline]
            pub fn count(&self, label: u8) -> usize {
                self.data.iter().filter(|&p| *p == label).count()
            }

            /// 统计图像中所有标签的像素个数.
            #[inline]
            pub fn histogram(&self) -> Histogram {
                self.data.iter().collect()
            }

            /// 在图像平面内 (仅 H, W 两个方向) 统计 `label1`-`label2`
            /// 相邻像素对的个数. 详见 [`contact::contact_2d`].
            #[inline]
            pub fn contact(&self, label1: u8, label2: u8) -> MorphResult<usize> {
                contact::contact_2d(self.array_view(), label1, label2)
            }

            /// 提取 `labels` 中的标签, 其它像素置为 0, 返回拥有所有权的新切片.
            pub fn filter(&self, labels: &[u8]) -> OwnedLabelSlice {
                let keep = label_set(labels);
                OwnedLabelSlice {
                    data: self.data.mapv(|p| if keep[p as usize] { p } else { 0 }),
                }
            }

            /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
            #[inline]
            pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
                self.data.indexed_iter()
            }

            /// 获取 `pos` 为中心的 3x3 邻域内所有不越界的像素值 (包括 `pos` 本身).
            pub fn n9_values(&self, (h, w): Idx2d) -> Vec<u8> {
                let mut ans = Vec::with_capacity(9);
                for dh in [h.wrapping_sub(1), h, h.saturating_add(1)] {
                    for dw in [w.wrapping_sub(1), w, w.saturating_add(1)] {
                        if let Some(&p) = self.get((dh, dw)) {
                            ans.push(p);
                        }
                    }
                }
                ans
            }
        }
    };
}

impl_label_slice_immut!('a, LabelSlice<'a>, ArrayView2<'a, u8>);
impl_label_slice_immut!('a, LabelSliceMut<'a>, ArrayViewMut2<'a, u8>);

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 拥有所有权的二维水平标签切片.
///
/// `OwnedLabelSlice` 仅提供到 `LabelSlice`
/// 的轻量转换和底层数据移动, 不提供任何其它方法.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedLabelSlice {
    data: Array2<u8>,
}

impl From<Array2<u8>> for OwnedLabelSlice {
    #[inline]
    fn from(data: Array2<u8>) -> Self {
        Self { data }
    }
}

impl OwnedLabelSlice {
    /// 获得不可变切片引用.
    #[inline]
    pub fn as_immut(&self) -> LabelSlice<'_> {
        LabelSlice::new(self.data.view())
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array2<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedLabelSlice;
    use ndarray::{array, Array2};

    #[test]
    fn test_slice_basics() {
        let s = OwnedLabelSlice::from(array![[0u8, 1, 1], [0, 2, 1]]);
        let v = s.as_immut();
        assert_eq!(v.shape(), (2, 3));
        assert_eq!(v.count(1), 3);
        assert_eq!(v.histogram().get(2), 1);
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), [0, 1, 1, 0, 2, 1]);
        assert_eq!(v.filter(&[2]).into_raw(), array![[0u8, 0, 0], [0, 2, 0]]);
    }

    #[test]
    fn test_n9_values_at_corner() {
        let s = OwnedLabelSlice::from(Array2::from_shape_fn((3, 3), |(h, w)| (h * 3 + w) as u8));
        let mut corner = s.as_immut().n9_values((0, 0));
        corner.sort_unstable();
        assert_eq!(corner, vec![0, 1, 3, 4]);
        assert_eq!(s.as_immut().n9_values((1, 1)).len(), 9);
    }
}
