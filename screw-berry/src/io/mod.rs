//! 与外部世界的交互: 标签图像栈的加载, 平滑, 以及结果表格的导出.

use std::path::{Path, PathBuf};

mod export;
mod loader;
mod smooth;

pub use export::{export_table, write_table, ExportError};
pub use loader::{load_slice, load_volume, LoadError};
pub use smooth::smooth;

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}
