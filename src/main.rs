//! Domain Hack - find unregistered domain hacks
//!
//! Prints every `label.tld` split of a dictionary word whose name does not
//! exist in the DNS. Lookup failures go to stderr as `domain: error`.

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use domain_hack::{hack::StreamSink, ScanConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = domain_hack::init() {
        eprintln!("Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("-h") | Some("--help") => {
            print_help();
            return;
        }
        Some("-V") | Some("--version") => {
            println!("domain-hack {}", domain_hack::VERSION);
            return;
        }
        Some(flag) if flag.starts_with('-') => {
            eprintln!("Unknown option: {}\nUse --help for usage information", flag);
            process::exit(2);
        }
        _ => {}
    }
    if args.len() > 1 {
        eprintln!("Too many arguments\nUse --help for usage information");
        process::exit(2);
    }

    let mut config = match ScanConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };
    if let Some(path) = args.first() {
        config.words_path = PathBuf::from(path);
    }

    let sink = Arc::new(StreamSink::stdio(config.format));
    match domain_hack::scan(&config, sink).await {
        Ok(summary) => {
            tracing::info!(
                unregistered = summary.unregistered,
                checks_per_second = %format!("{:.1}", summary.checks_per_second()),
                "Done"
            );
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn print_help() {
    println!("domain-hack {} - find unregistered domain hacks", domain_hack::VERSION);
    println!();
    println!("USAGE:");
    println!("    domain-hack [WORDS_FILE]");
    println!();
    println!("Every word is split on each known TLD that ends it (radio -> rad.io) and");
    println!("the result is printed when the DNS says the name does not exist.");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    DOMAIN_HACK_WORDS              Word list path (default: /usr/share/dict/words)");
    println!("    DOMAIN_HACK_TLDS               TLD list URL or file (default: IANA list)");
    println!("    DOMAIN_HACK_WORKERS            Concurrent lookups (default: 100)");
    println!("    DOMAIN_HACK_QUEUE_CAPACITY     Pending candidates before generation waits (default: 1)");
    println!("    DOMAIN_HACK_DEDUPE             Check each distinct candidate once (default: false)");
    println!("    DOMAIN_HACK_SKIP_EMPTY_LABELS  Skip words that are a TLD themselves (default: false)");
    println!("    DOMAIN_HACK_RESOLVER           system, google, cloudflare or quad9 (default: system)");
    println!("    DOMAIN_HACK_DNS_TIMEOUT_SECS   Per-query resolver timeout");
    println!("    DOMAIN_HACK_FORMAT             text or json (default: text)");
    println!("    RUST_LOG                       Log filter (default: warn)");
}
