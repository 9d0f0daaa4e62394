use std::time::Duration;

use crate::consts::{AUTHOR, REPO, format_number};
use crate::form::state::{RaceMode, Stats};

pub struct BannerInfo<'a> {
    pub provider: &'a str,
    pub base_url: &'a str,
    pub race_mode: RaceMode,
    pub timeout: Option<Duration>,
}

fn timeout_label(timeout: Option<Duration>) -> String {
    match timeout {
        Some(limit) => format!("{}s", limit.as_secs_f64()),
        None => "wait forever".to_string(),
    }
}

fn banner_text(info: &BannerInfo) -> String {
    format!(
        "\n  quickfx {version}  ·  {author}\n  {repo}\n\n  \
         rates    {provider} @ {base}\n  \
         races    {races}\n  \
         timeout  {timeout}\n\n  \
         try `100 usd eur`, `to gbp`, or /help\n",
        version = env!("CARGO_PKG_VERSION"),
        author = AUTHOR,
        repo = REPO,
        provider = info.provider,
        base = info.base_url,
        races = info.race_mode,
        timeout = timeout_label(info.timeout),
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

fn summary_text(stats: Stats) -> Option<String> {
    (stats.issued > 0).then(|| {
        format!(
            "session: {} requests, {} applied, {} stale",
            format_number(stats.issued),
            format_number(stats.applied),
            format_number(stats.discarded),
        )
    })
}

/// Request counts, if any were sent, then a farewell.
pub fn print_session_summary(stats: Stats) {
    if let Some(line) = summary_text(stats) {
        println!("{line}");
    }
    println!("goodbye.");
}
