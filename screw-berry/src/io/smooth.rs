use crate::data::label_set;
use crate::LabelVolume;

/// 对 `labels` 中的标签做层内 3x3 中值滤波, 返回新的体数据.
///
/// 只有值属于 `labels` 的体素可能被改写, 并且只会被改写为邻域 (含自身, 不越界)
/// 的中值, 前提是该中值同样属于 `labels`. 其它体素保持不变.
pub fn smooth(volume: &LabelVolume, labels: &[u8]) -> LabelVolume {
    let allowed = label_set(labels);
    let mut ans = volume.clone();
    let mut changed = 0usize;

    for (src, mut dst) in volume.slice_iter().zip(ans.slice_iter_mut()) {
        for ((h, w), &p) in src.indexed_iter() {
            if !allowed[p as usize] {
                continue;
            }
            let mut n9 = src.n9_values((h, w));
            let mid = n9.len() / 2;
            let (_, &mut median, _) = n9.select_nth_unstable(mid);
            if median != p && allowed[median as usize] {
                dst[(h, w)] = median;
                changed += 1;
            }
        }
    }
    log::debug!("smooth {labels:?}: {changed} voxels relabeled");
    ans
}
