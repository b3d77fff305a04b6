use super::Sample;
use crate::MorphResult;

/// 单个水平切片的降解统计.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliceRecord {
    /// 切片索引.
    pub index: usize,

    /// 初始暴露面积 (mm²), 即参考切片中背景与参考骨钉的层内接触.
    pub surface_area: f64,

    /// 体积损失 (mm³).
    pub volume_loss: f64,

    /// 降解速率 (mm/年).
    pub degradation_rate: f64,
}

/// 逐层统计结果, 以列的形式保存, 顺序与切片顺序一致.
///
/// 无法计算的切片可以用 [`Self::push_missing`] 以 NaN 占位, 使第 `i` 行始终对应第 `i` 层.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliceSeries {
    /// 各层初始暴露面积 (mm²).
    pub surface_area: Vec<f64>,
    /// 各层体积损失 (mm³).
    pub volume_loss: Vec<f64>,
    /// 各层降解速率 (mm/年).
    pub degradation_rate: Vec<f64>,
}

impl SliceSeries {
    /// 导出时使用的列名.
    pub const HEADERS: [&'static str; 3] = ["Surface Area", "Volume loss", "Degradation rate"];

    /// 记录条数.
    #[inline]
    pub fn len(&self) -> usize {
        self.surface_area.len()
    }

    /// 是否没有任何记录.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 追加一条记录.
    pub fn push(&mut self, record: SliceRecord) {
        self.surface_area.push(record.surface_area);
        self.volume_loss.push(record.volume_loss);
        self.degradation_rate.push(record.degradation_rate);
    }

    /// 追加一条所有数值均为 NaN 的占位记录.
    pub fn push_missing(&mut self) {
        self.surface_area.push(f64::NAN);
        self.volume_loss.push(f64::NAN);
        self.degradation_rate.push(f64::NAN);
    }

    /// 带列名的各列, 可直接交给 [`crate::io::export_table`].
    pub fn columns(&self) -> [(&'static str, &[f64]); 3] {
        [
            (Self::HEADERS[0], self.surface_area.as_slice()),
            (Self::HEADERS[1], self.volume_loss.as_slice()),
            (Self::HEADERS[2], self.degradation_rate.as_slice()),
        ]
    }
}

impl FromIterator<SliceRecord> for SliceSeries {
    fn from_iter<T: IntoIterator<Item = SliceRecord>>(iter: T) -> Self {
        let mut ans = Self::default();
        iter.into_iter().for_each(|r| ans.push(r));
        ans
    }
}

/// 按切片顺序惰性计算 [`SliceRecord`] 的迭代器.
///
/// 每次 `next` 只处理一层, 调用方停止迭代即可在切片粒度上中断计算.
#[derive(Clone, Debug)]
pub struct SliceSeriesIter<'a> {
    sample: &'a Sample,
    next: usize,
}

impl<'a> SliceSeriesIter<'a> {
    pub(super) fn new(sample: &'a Sample) -> Self {
        Self { sample, next: 0 }
    }
}

impl Iterator for SliceSeriesIter<'_> {
    type Item = MorphResult<SliceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.sample.len_z() {
            return None;
        }
        let ans = self.sample.slice_record(self.next);
        self.next += 1;
        Some(ans)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.sample.len_z() - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SliceSeriesIter<'_> {}
