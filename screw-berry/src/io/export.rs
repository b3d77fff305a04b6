//! 结果表格的导出.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// 导出表格时的错误.
#[derive(Debug, Error)]
pub enum ExportError {
    /// 各列长度不一致.
    #[error("column `{name}` has {found} rows, expected {expected}")]
    LengthMismatch {
        /// 列名.
        name: String,
        /// 第一列的长度.
        expected: usize,
        /// 该列的长度.
        found: usize,
    },

    /// CSV 编码错误.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// 文件读写错误.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 将若干等长的具名数值列以 CSV 格式写入 `writer`.
///
/// 第一行为列名, 之后每个索引一行. NaN 表示缺失值, 写为空单元格.
pub fn write_table<W: Write>(writer: W, columns: &[(&str, &[f64])]) -> Result<(), ExportError> {
    let rows = columns.first().map_or(0, |(_, col)| col.len());
    if let Some((name, col)) = columns.iter().find(|(_, col)| col.len() != rows) {
        return Err(ExportError::LengthMismatch {
            name: name.to_string(),
            expected: rows,
            found: col.len(),
        });
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|(name, _)| *name))?;
    for i in 0..rows {
        wtr.write_record(columns.iter().map(|(_, col)| match col[i] {
            v if v.is_nan() => String::new(),
            v => v.to_string(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// 将若干等长的具名数值列导出为 `path` 处的 CSV 文件.
pub fn export_table<P: AsRef<Path>>(path: P, columns: &[(&str, &[f64])]) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_table(BufWriter::new(File::create(path)?), columns)?;
    log::info!("table with {} columns written to {}", columns.len(), path.display());
    Ok(())
}
