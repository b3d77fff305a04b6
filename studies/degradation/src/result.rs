//! 实验结果.

use screw_berry::sample::SampleSummary;
use screw_berry::MorphResult;
use std::io::{self, Write};
use std::path::PathBuf;

/// 单个样本的分析结果.
pub struct SampleOutcome {
    /// 样本的标量结果.
    pub summary: SampleSummary,
    /// 导出表格的数据行数, 每层一行.
    pub slices: usize,
    /// 因缺少初始暴露面而留空的切片数.
    pub skipped: usize,
    /// 导出表格的路径.
    pub table: PathBuf,
}

/// 将 `o` 的结果写进 `w` 中.
fn describe_into<W: Write>(o: &SampleOutcome, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: &MorphResult<f64>) -> String {
        match f {
            Ok(f) => format!("{f:.6}"),
            Err(e) => format!("/ ({e})"),
        }
    }

    let s = &o.summary;
    writeln!(w, "Sample `{}`:", s.name)?;
    writeln!(w, "{S4}Initial volume: {:.6} mm3", s.initial_volume)?;
    writeln!(w, "{S4}Residual volume: {:.6} mm3", s.residual_volume)?;
    writeln!(w, "{S4}Initial area: {} mm2", f64_to_display(&s.initial_area))?;
    writeln!(w, "{S4}Volume loss: {} %", f64_to_display(&s.volume_loss_percent))?;
    writeln!(w, "{S4}Degradation rate: {} mm/year", f64_to_display(&s.degradation_rate))?;
    writeln!(w, "{S4}BIC: {}", f64_to_display(&s.bone_to_implant_contact))?;
    writeln!(w, "{S4}BV/TV: {}", f64_to_display(&s.bone_volume_to_total_volume))?;
    write!(
        w,
        "{S4}Per-slice table: {} rows, {} left empty, written to {}",
        o.slices,
        o.skipped,
        o.table.display()
    )?;
    Ok(())
}

/// 批量实验最终结果.
pub struct StudyResult {
    data: Vec<(String, anyhow::Result<SampleOutcome>)>,
}

impl StudyResult {
    pub fn new(data: Vec<(String, anyhow::Result<SampleOutcome>)>) -> Self {
        Self { data }
    }

    /// 样本个数.
    pub fn total(&self) -> usize {
        self.data.len()
    }

    /// 失败的样本个数.
    pub fn failures(&self) -> usize {
        self.data.iter().filter(|(_, o)| o.is_err()).count()
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        utils::sep_to(&mut out)?;
        let mut buf = Vec::with_capacity(512);

        for (name, outcome) in self.data.iter() {
            match outcome {
                Ok(o) => describe_into(o, &mut buf)?,
                Err(e) => write!(&mut buf, "Sample `{name}` failed: {e:#}")?,
            }
            writeln!(out, "{}", String::from_utf8_lossy(&buf))?;
            buf.clear();

            utils::sep_to(&mut out)?;
        }
        Ok(())
    }
}
