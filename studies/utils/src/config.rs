//! 对 `screw-berry::sample` 配置的更一层封装. 提供样本配置与输出目录的查找.

use anyhow::{Context, Result};
use screw_berry::sample::SampleConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 获取样本配置文件路径.
///
/// 1. 若环境变量 `$SCREW_BERRY_CONFIG` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/screw/samples.json`. 无法确定主目录时返回 `None`.
pub fn config_path_from_env_or_home() -> Option<PathBuf> {
    match env::var_os("SCREW_BERRY_CONFIG") {
        Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => screw_berry::io::home_dataset_dir_with(["screw", "samples.json"]),
    }
}

/// 获取结果输出目录.
///
/// 1. 若环境变量 `$SCREW_BERRY_OUT` 非空, 则返回其值;
/// 2. 否则, 返回当前目录.
pub fn out_dir_from_env_or_cwd() -> PathBuf {
    match env::var_os("SCREW_BERRY_OUT") {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from("."),
    }
}

/// 解析 JSON 数组形式的样本配置, 并逐个校验.
pub fn parse_configs(text: &str) -> Result<Vec<SampleConfig>> {
    let configs: Vec<SampleConfig> =
        serde_json::from_str(text).context("parsing sample configurations")?;
    for c in configs.iter() {
        c.validate()
            .with_context(|| format!("invalid configuration of sample `{}`", c.name))?;
    }
    Ok(configs)
}

/// 从 `path` 加载样本配置.
pub fn load_configs<P: AsRef<Path>>(path: P) -> Result<Vec<SampleConfig>> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_configs(&text)
}

/// 从 `$SCREW_BERRY_CONFIG` 或者 `$HOME/dataset/screw/samples.json` 加载样本配置.
#[inline]
pub fn load_configs_from_env_or_home() -> Result<Vec<SampleConfig>> {
    let path = config_path_from_env_or_home().context("cannot locate the home directory")?;
    load_configs(path)
}
