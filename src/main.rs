// ==========================================
// 加权槽位调度系统 - 命令行入口
// ==========================================
// 用法: fair-slot-scheduler run [--config FILE] [--seed N] [--intervals N]
//       [--queues N] [--policy P] [--runs N] [--csv FILE] [--json FILE]
// 优先级: 命令行参数 > 环境变量 > 配置文件 > 默认值
// ==========================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fair_slot_scheduler::{
    logging, perf, run_batch, ConfigManager, EligibilityPolicy, SimulationOrchestrator,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fair-slot-scheduler", version, about = "加权队列槽位分配模拟")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 执行模拟并输出每队列汇总
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 周期数
    #[arg(long)]
    intervals: Option<u64>,

    /// 队列数
    #[arg(long)]
    queues: Option<usize>,

    /// 准入策略: all | nonempty | nonempty-or-active
    #[arg(long)]
    policy: Option<EligibilityPolicy>,

    /// 独立运行次数（种子依次 +1）
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// 欠额表 CSV 输出路径
    #[arg(long)]
    csv: Option<PathBuf>,

    /// 报告 JSON 输出路径
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    perf::configure_from_env();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    tracing::info!("{} v{}", fair_slot_scheduler::APP_NAME, fair_slot_scheduler::VERSION);

    let manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?,
        None => ConfigManager::new(),
    };

    let config = manager
        .with_env_overrides()
        .context("环境变量覆写失败")?
        .update(|c| {
            if let Some(seed) = args.seed {
                c.seed = seed;
            }
            if let Some(intervals) = args.intervals {
                c.intervals = intervals;
            }
            if let Some(queues) = args.queues {
                c.queue_count = queues;
                // 队列数变化后显式权重不再适用
                if c.weights.as_ref().is_some_and(|w| w.len() != queues) {
                    c.weights = None;
                }
            }
            if let Some(policy) = args.policy {
                c.policy = policy;
            }
        })
        .build()
        .context("配置校验失败")?;

    let reports = if args.runs <= 1 {
        vec![SimulationOrchestrator::new(config)
            .context("初始化模拟失败")?
            .run()
            .context("模拟执行失败")?]
    } else {
        run_batch(&config, args.runs).context("批量模拟执行失败")?
    };

    for report in &reports {
        println!("{}", report.summary_table());
    }

    let multi = reports.len() > 1;
    for (i, report) in reports.iter().enumerate() {
        if let Some(path) = &args.csv {
            let path = output_path(path, i, multi);
            report
                .write_csv_file(&path)
                .with_context(|| format!("写出 CSV 失败: {}", path.display()))?;
            tracing::info!(path = %path.display(), "欠额表已写出");
        }
        if let Some(path) = &args.json {
            let path = output_path(path, i, multi);
            report
                .write_json_file(&path)
                .with_context(|| format!("写出 JSON 失败: {}", path.display()))?;
            tracing::info!(path = %path.display(), "运行报告已写出");
        }
    }

    Ok(())
}

/// 批量模式下在文件名后追加序号: deficits.csv → deficits_1.csv
fn output_path(base: &Path, index: usize, multi: bool) -> PathBuf {
    if !multi {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    base.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_single_run_unchanged() {
        assert_eq!(
            output_path(Path::new("out/deficits.csv"), 0, false),
            PathBuf::from("out/deficits.csv")
        );
    }

    #[test]
    fn test_output_path_batch_appends_index() {
        assert_eq!(
            output_path(Path::new("out/deficits.csv"), 2, true),
            PathBuf::from("out/deficits_2.csv")
        );
        assert_eq!(
            output_path(Path::new("report"), 1, true),
            PathBuf::from("report_1")
        );
    }

    #[test]
    fn test_cli_parses_run_arguments() {
        let cli = Cli::try_parse_from([
            "fair-slot-scheduler",
            "run",
            "--seed",
            "7",
            "--policy",
            "nonempty",
            "--runs",
            "3",
        ])
        .unwrap();

        let Command::Run(args) = cli.command;
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.policy, Some(EligibilityPolicy::NonEmpty));
        assert_eq!(args.runs, 3);
        assert!(args.csv.is_none());
    }
}
