/// 区域事件监控 (Region Event Sentinel)
///
/// 逐行读取检测负载 (JSON Lines),逐行输出事件信号
///
/// 主程序入口 - 直接运行: cargo run --bin sentinel -- --input frames.jsonl
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use roi_events::{Pipeline, SentinelConfig, UseCaseConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 区域事件监控参数
#[derive(Parser, Debug)]
#[command(author, version, about = "区域事件监控 - 检测事件开始/结束判定", long_about = None)]
struct Args {
    /// 配置文件 (不存在时创建默认配置)
    #[arg(short, long, default_value = "sentinel.json")]
    config: String,

    /// base64编码的感兴趣区域 (需与 --params 同时提供)
    #[arg(long, requires = "params")]
    area_of_interest: Option<String>,

    /// base64编码的业务参数 {"minOcurrences", "maxOutliers"}
    #[arg(long, requires = "area_of_interest")]
    params: Option<String>,

    /// 检测负载文件 (默认标准输入)
    #[arg(short, long)]
    input: Option<String>,

    /// 日志过滤
    #[arg(long, default_value = "roi_events=info,sentinel=info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(io::stderr)
        .init();

    info!("🚀 区域事件监控启动");

    // ========== 加载配置 ==========
    let config = match (args.area_of_interest, args.params) {
        (Some(area_of_interest), Some(params)) => {
            let use_case = UseCaseConfig {
                area_of_interest,
                params,
            };
            SentinelConfig::from_use_case(&use_case).context("用例参数解码失败")?
        }
        _ => SentinelConfig::load(&args.config),
    };
    config.log_summary();

    let mut pipeline = Pipeline::new(&config).context("配置无效")?;

    // ========== 输入输出 ==========
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("无法打开输入文件 {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let mut rejected = 0u64;
    let mut emitted = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("读取输入失败")?;
        if line.trim().is_empty() {
            continue;
        }

        // 无效负载直接拒绝,不进入追踪器
        let signals = match pipeline.process_line(&line) {
            Ok(signals) => signals,
            Err(e) => {
                error!("❌ 第 {} 行负载无效: {}", line_no + 1, e);
                rejected += 1;
                continue;
            }
        };

        for signal in signals {
            serde_json::to_writer(&mut out, &signal)?;
            writeln!(out)?;
            emitted += 1;
        }
        out.flush()?;
    }

    info!(
        "✅ 处理完成: 帧 {} | 信号 {} | 拒绝 {}",
        pipeline.frame_count(),
        emitted,
        rejected
    );
    Ok(())
}
