use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use arcovid::{collect_reports, fetch_global_table, Config, HttpClient, PdfCache, ProvinceInferrer};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcovid")]
#[command(about = "阿根廷疫情日报抓取与省份推断", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 推断一段文本对应的省份
    Infer {
        /// 候选地名
        text: String,
    },

    /// 抓取卫生部日报，输出各省确诊人数
    Reports {
        /// PDF 缓存目录（默认 ./cache）
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// 日报索引页
        #[arg(long)]
        index_url: Option<String>,

        /// 输出 CSV 文件（默认标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 抓取全球时间序列，输出合并后的表
    Global {
        /// CSV 根地址
        #[arg(long)]
        csv_base: Option<String>,

        /// 输出 CSV 文件（默认标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn write_csv<T: Serialize>(rows: &[T], output: Option<&PathBuf>) -> Result<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Infer { text } => {
            let m = ProvinceInferrer::global().infer(&text);
            println!("{}\t{:.3}", m.province, m.score);
        }

        Commands::Reports {
            cache_dir,
            index_url,
            output,
        } => {
            let mut config = Config::default();
            if let Some(dir) = cache_dir {
                config = config.with_cache_dir(dir);
            }
            if let Some(url) = index_url {
                config = config.with_index_url(url);
            }

            let client = HttpClient::new(&config)?;
            let cache = PdfCache::new(&config.cache_dir);
            info!(cache = %cache.dir().display(), "using pdf cache");
            let records = collect_reports(&client, &cache, ProvinceInferrer::global(), &config.index_url)
                .context("report extraction failed")?;
            write_csv(&records, output.as_ref())?;
            info!(records = records.len(), "done");
        }

        Commands::Global { csv_base, output } => {
            let mut config = Config::default();
            if let Some(base) = csv_base {
                config = config.with_csv_base(base);
            }

            let client = HttpClient::new(&config)?;
            let table = fetch_global_table(&client, &config).context("time series failed")?;
            write_csv(&table, output.as_ref())?;
            info!(rows = table.len(), "done");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_defaults() {
        let cli = Cli::try_parse_from(["arcovid", "reports"]).unwrap();
        let Commands::Reports {
            cache_dir,
            index_url,
            output,
        } = cli.command
        else {
            panic!("expected reports subcommand");
        };
        assert_eq!(cache_dir, None);
        assert_eq!(index_url, None);
        assert_eq!(output, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_reports_cache_dir() {
        let cli = Cli::try_parse_from(["arcovid", "reports", "--cache-dir", "/tmp/pdfs", "-v"]).unwrap();
        let Commands::Reports { cache_dir, .. } = cli.command else {
            panic!("expected reports subcommand");
        };
        assert_eq!(cache_dir, Some(PathBuf::from("/tmp/pdfs")));
        assert!(cli.verbose);
    }
}
