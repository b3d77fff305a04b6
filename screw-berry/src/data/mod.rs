use std::ops::Index;
use std::path::Path;

use ndarray::{Array2, Array3, ArrayView, Axis, Ix3};
use ndarray_npy::{ReadNpyError, WriteNpyError};

use crate::label::LabelDictionary;
use crate::morph::contact;
use crate::{Idx2d, Idx3d, MorphError, MorphResult};

mod histogram;
pub mod slice;

pub use histogram::Histogram;
pub use slice::{ImgWriteRaw, LabelSlice, LabelSliceMut, OwnedLabelSlice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 查找表: `ans[p]` 为 `true` 当且仅当 `p` 在 `labels` 中.
#[inline]
pub(crate) fn label_set(labels: &[u8]) -> [bool; 256] {
    let mut ans = [false; 256];
    labels.iter().for_each(|&l| ans[l as usize] = true);
    ans
}

/// 由 2D 标签图像按 z 方向堆叠而成的 3D 标签体数据, 按 (z, H, W) 访问.
///
/// 单个 2D 切片也可以视为 `z == 1` 的体数据.
/// 所有派生操作 ([`Self::filter`], [`Self::remap`] 等) 都返回新的体数据,
/// 不会修改原数据.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelVolume {
    data: Array3<u8>,
}

impl Index<Idx3d> for LabelVolume {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Array3<u8>> for LabelVolume {
    #[inline]
    fn from(data: Array3<u8>) -> Self {
        Self::new(data)
    }
}

impl LabelVolume {
    /// 直接从 (z, H, W) 格式的数组创建. 必要时转换为行优先存储.
    pub fn new(data: Array3<u8>) -> Self {
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());
        Self { data }
    }

    /// 创建形状为 `shape`, 所有体素为 `label` 的体数据.
    #[inline]
    pub fn from_elem(shape: Idx3d, label: u8) -> Self {
        Self {
            data: Array3::from_elem(shape, label),
        }
    }

    /// 按顺序将 `slices` 沿 z 方向堆叠. 迭代顺序即 z 轴顺序.
    ///
    /// 如果没有任何切片则返回 `Err(EmptyInput)`;
    /// 如果切片形状不一致则返回 `Err(SliceShapeMismatch)`.
    pub fn from_slices<I: IntoIterator<Item = Array2<u8>>>(slices: I) -> MorphResult<Self> {
        let slices: Vec<Array2<u8>> = slices.into_iter().collect();
        let Some(first) = slices.first() else {
            return Err(MorphError::EmptyInput);
        };
        let (h, w) = first.dim();
        let mut data = Array3::zeros((slices.len(), h, w));
        for (i, s) in slices.iter().enumerate() {
            if s.dim() != (h, w) {
                return Err(MorphError::SliceShapeMismatch {
                    expected: (h, w),
                    found: s.dim(),
                });
            }
            data.index_axis_mut(Axis(0), i).assign(s);
        }
        Ok(Self { data })
    }

    /// 打开 `.npy` 格式保存的 (z, H, W) 体数据. 可用于缓存已加载的图像栈.
    pub fn open_npy<P: AsRef<Path>>(path: P) -> Result<Self, ReadNpyError> {
        let data: Array3<u8> = ndarray_npy::read_npy(path.as_ref())?;
        Ok(Self::new(data))
    }

    /// 将体数据以 `.npy` 格式保存到 `path`.
    pub fn save_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError> {
        ndarray_npy::write_npy(path.as_ref(), &self.data)
    }

    /// 获取数据形状大小 (z, H, W).
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取水平切片形状大小 (H, W).
    #[inline]
    pub fn slice_shape(&self) -> Idx2d {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 获取水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获取体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array3<u8> {
        self.data
    }

    /// 获取 z 空间的第 `z_index` 层不可变切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> LabelSlice {
        LabelSlice::new(self.data.index_axis(Axis(0), z_index))
    }

    /// 获取能按升序迭代水平不可变切片的迭代器.
    #[inline]
    pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = LabelSlice> {
        self.data.axis_iter(Axis(0)).map(LabelSlice::new)
    }

    /// 获取能按升序迭代水平可变切片的迭代器.
    #[inline]
    pub fn slice_iter_mut(&mut self) -> impl ExactSizeIterator<Item = LabelSliceMut> {
        self.data.axis_iter_mut(Axis(0)).map(LabelSliceMut::new)
    }

    /// 统计所有标签的体素个数.
    #[inline]
    pub fn histogram(&self) -> Histogram {
        self.data.iter().collect()
    }

    /// 获取值为 `label` 的体素个数. 标签不存在时返回 0.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 获取值为 `label` 的体素个数. 标签不存在时返回 `Err(LabelNotFound)`.
    pub fn count_present(&self, label: u8) -> MorphResult<usize> {
        match self.count(label) {
            0 => Err(MorphError::LabelNotFound(label)),
            n => Ok(n),
        }
    }

    /// 按升序获取体数据中出现过的所有标签.
    #[inline]
    pub fn labels_present(&self) -> Vec<u8> {
        self.histogram().labels().collect()
    }

    /// 检查每个体素值都是 `labels` 中某个角色的编码.
    pub fn validate_against(&self, labels: &LabelDictionary) -> MorphResult<()> {
        match self.histogram().labels().find(|l| !labels.contains_code(*l)) {
            Some(l) => Err(MorphError::UnknownLabel(l)),
            None => Ok(()),
        }
    }

    /// 提取 `labels` 中的标签, 其它体素置为 0. 返回新的体数据.
    ///
    /// 不存在的标签不会导致错误, 只是结果中没有对应体素.
    #[inline]
    pub fn filter(&self, labels: &[u8]) -> Self {
        self.filter_or(labels, 0)
    }

    /// 提取 `labels` 中的标签, 其它体素置为 `fill`. 返回新的体数据.
    pub fn filter_or(&self, labels: &[u8], fill: u8) -> Self {
        let keep = label_set(labels);
        Self {
            data: self.data.mapv(|p| if keep[p as usize] { p } else { fill }),
        }
    }

    /// 将值为 `from` 的体素改写为 `to`. 返回新的体数据.
    pub fn remap(&self, from: u8, to: u8) -> Self {
        Self {
            data: self.data.mapv(|p| if p == from { to } else { p }),
        }
    }

    /// 沿 z, H, W 三个方向统计 `label1`-`label2` 相邻体素对的个数.
    /// 详见 [`contact::contact_3d`].
    #[inline]
    pub fn contact(&self, label1: u8, label2: u8) -> MorphResult<usize> {
        contact::contact_3d(self.data(), label1, label2)
    }

    /// 将每一层视为独立的 2D 区域, 统计层内 `label1`-`label2` 相邻像素对的个数.
    /// 详见 [`contact::contact_layered`].
    #[inline]
    pub fn contact_layered(&self, label1: u8, label2: u8) -> MorphResult<usize> {
        contact::contact_layered(self.data(), label1, label2)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
    }
}

/// 并发操作部分
#[cfg(feature = "rayon")]
impl LabelVolume {
    /// 借助 `rayon`, 按层并行统计直方图.
    pub fn par_histogram(&self) -> Histogram {
        self.data
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|v| v.iter().collect::<Histogram>())
            .reduce(Histogram::default, |mut a, b| {
                a += &b;
                a
            })
    }
}
