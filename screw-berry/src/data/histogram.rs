use std::ops::AddAssign;

/// 标签值的稠密直方图, 每个 `u8` 标签一个桶.
///
/// 不存在的标签计数为 0, 查询永远不会失败.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [usize; 256],
}

impl Default for Histogram {
    #[inline]
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}

impl<'a> FromIterator<&'a u8> for Histogram {
    fn from_iter<I: IntoIterator<Item = &'a u8>>(iter: I) -> Self {
        let mut ans = Self::default();
        for &p in iter {
            ans.bins[p as usize] += 1;
        }
        ans
    }
}

impl AddAssign<&Histogram> for Histogram {
    fn add_assign(&mut self, rhs: &Histogram) {
        for (l, r) in self.bins.iter_mut().zip(rhs.bins.iter()) {
            *l += *r;
        }
    }
}

impl Histogram {
    /// 标签 `label` 的体素个数. 不存在时为 0.
    #[inline]
    pub fn get(&self, label: u8) -> usize {
        self.bins[label as usize]
    }

    /// 标签 `label` 是否至少出现一次?
    #[inline]
    pub fn contains(&self, label: u8) -> bool {
        self.get(label) != 0
    }

    /// 体素总数.
    #[inline]
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// 按升序迭代所有出现过的 `(标签, 个数)`.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(l, c)| (l as u8, *c))
    }

    /// 按升序迭代所有出现过的标签.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().map(|(l, _)| l)
    }
}
