//! rsuaparser 命令行工具
//!
//! ```text
//! rsuaparser --rules regexes.yaml parse "Mozilla/5.0 ..."
//! cat access_ua.txt | rsuaparser --rules regexes.yaml parse --json
//! rsuaparser --rules regexes.yaml resolve --id " 12 3 -1" "Mozilla/5.0 ..."
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rsuaparser::{Client, ConfigManager, UaParser};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rsuaparser", version, about = "User-Agent 解析工具（uap-core 规则）")]
struct Cli {
    /// 本地 regexes.yaml 路径，不指定时使用缓存或远程规则
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// 规则缓存路径
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// 规则版本号，写入客户端ID（不能包含空格）
    #[arg(long, global = true, default_value = "")]
    data_version: String,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 解析 UA，未给出参数时逐行读取标准输入
    Parse {
        /// 每行输出一个 JSON 对象
        #[arg(long)]
        json: bool,
        user_agents: Vec<String>,
    },
    /// 根据客户端ID和原始 UA 还原解析结果
    Resolve {
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: bool,
        user_agent: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut builder = ConfigManager::custom()
        .data_version(cli.data_version.clone())
        .verbose(cli.verbose);
    if let Some(rules) = &cli.rules {
        builder = builder.rules_path(rules.clone());
    }
    if let Some(cache) = &cli.cache {
        builder = builder.rule_cache_path(cache.clone());
    }

    let parser = UaParser::new(builder.build())
        .await
        .context("规则库加载失败")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Parse { json, user_agents } => {
            if user_agents.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line.context("读取标准输入失败")?;
                    print_client(&mut out, &parser.classify(&line), json)?;
                }
            } else {
                for ua in &user_agents {
                    print_client(&mut out, &parser.classify(ua), json)?;
                }
            }
        }
        Command::Resolve { id, json, user_agent } => {
            let client = parser
                .resolve(&id, &user_agent)
                .with_context(|| format!("客户端ID '{}' 还原失败", id))?;
            print_client(&mut out, &client, json)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn print_client(out: &mut impl Write, client: &Client, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(client)?)?;
    } else {
        writeln!(
            out,
            "ua: {}\tos: {}\tdevice: {}\tid: {}",
            client.user_agent, client.os, client.device, client.id
        )?;
    }
    Ok(())
}
