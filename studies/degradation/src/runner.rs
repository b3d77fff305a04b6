//! 程序运行函数.

use crate::result::{SampleOutcome, StudyResult};
use anyhow::{anyhow, Context};
use screw_berry::io;
use screw_berry::sample::{Sample, SampleConfig, SliceSeries};
use std::path::Path;
use std::thread;

/// 分析单个样本, 并将逐层统计导出到 `out_dir/{name}.csv`.
///
/// 参考骨钉之外的切片没有初始暴露面, 这些切片在表格中留空并计数,
/// 表格第 `i` 个数据行始终对应第 `i` 层.
fn analyze(config: &SampleConfig, out_dir: &Path) -> anyhow::Result<SampleOutcome> {
    let sample =
        Sample::load(config).with_context(|| format!("loading sample `{}`", config.name))?;
    let summary = sample.summary(config.roi_size);

    let mut series = SliceSeries::default();
    let mut skipped = 0usize;
    for record in sample.slice_series_iter() {
        match record {
            Ok(r) => series.push(r),
            Err(e) => {
                log::debug!("sample `{}`: {e}", config.name);
                series.push_missing();
                skipped += 1;
            }
        }
    }

    let table = out_dir.join(format!("{}.csv", config.name));
    io::export_table(&table, &series.columns())
        .with_context(|| format!("exporting {}", table.display()))?;

    Ok(SampleOutcome {
        summary,
        slices: series.len(),
        skipped,
        table,
    })
}

/// 实际运行. 每个样本在独立线程中分析, 同时运行的线程数不超过核心数.
///
/// 某个样本失败不影响其它样本.
pub fn run(configs: &[SampleConfig], out_dir: &Path) -> StudyResult {
    println!("Analyzing {} samples...", configs.len());
    let mut data = Vec::with_capacity(configs.len());

    for chunk in configs.chunks(utils::cpus().max(1)) {
        thread::scope(|s| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|c| s.spawn(move || analyze(c, out_dir)))
                .collect();
            for (c, th) in chunk.iter().zip(handles) {
                let outcome = th
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("analysis thread panicked")));
                if let Err(e) = &outcome {
                    log::error!("sample `{}`: {e:#}", c.name);
                }
                data.push((c.name.clone(), outcome));
            }
        });
    }
    StudyResult::new(data)
}
