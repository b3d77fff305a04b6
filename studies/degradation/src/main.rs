//! 批量计算每个样本的降解与骨整合指标.

mod result;
mod runner;

use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let configs = utils::config::load_configs_from_env_or_home()?;
    let out_dir = utils::config::out_dir_from_env_or_cwd();
    std::fs::create_dir_all(&out_dir)?;

    let result = runner::run(&configs, &out_dir);
    result.analyze()?;
    if result.failures() > 0 {
        log::warn!("{} of {} samples failed", result.failures(), result.total());
    }
    Ok(())
}
