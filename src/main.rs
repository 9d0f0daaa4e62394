use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use quickfx::banner::{BannerInfo, print_banner, print_session_summary};
use quickfx::commands::{CommandRegistry, CommandResult, SessionInfo, StateChange};
use quickfx::consts::{DEFAULT_BASE_URL, DEFAULT_CLI_TIMEOUT};
use quickfx::controller::{Controller, ControllerConfig};
use quickfx::currency::Currency;
use quickfx::form::state::{RaceMode, View};
use quickfx::form::{ConversionRequest, Plan, plan};
use quickfx::input::{Edit, parse_line};
use quickfx::logging::init_logger;
use quickfx::provider::frankfurter::FrankfurterProvider;
use quickfx::spinner::follow_loading;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RaceArg {
    /// Only the most recently issued request may update the result
    Latest,
    /// Whichever response lands last wins
    Legacy,
}

impl From<RaceArg> for RaceMode {
    fn from(arg: RaceArg) -> Self {
        match arg {
            RaceArg::Latest => RaceMode::Latest,
            RaceArg::Legacy => RaceMode::Legacy,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "quickfx",
    version,
    about = "Convert an amount between two currencies."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Rate provider base URL (the `/latest` endpoint is appended)
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// How overlapping responses are reconciled
    #[arg(long, value_enum, default_value_t = RaceArg::Latest)]
    race_mode: RaceArg,

    /// Request timeout in seconds (0 waits forever)
    #[arg(short, long, default_value_t = DEFAULT_CLI_TIMEOUT.as_secs())]
    timeout: u64,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Skip the startup banner
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert once and exit
    Convert {
        /// Amount to convert
        amount: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
    },
    /// List supported currencies
    Currencies,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    if let Some(Command::Currencies) = cli.command {
        for currency in Currency::ALL {
            println!("{}  {}", currency, currency.name());
        }
        return Ok(());
    }

    let provider = Arc::new(FrankfurterProvider::new(&cli.base_url)?);
    let base_url = provider.base_url().to_string();
    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));

    let controller = Controller::new(
        provider,
        ControllerConfig {
            race_mode: cli.race_mode.into(),
            request_timeout: timeout,
        },
    );

    // Single conversion mode
    if let Some(Command::Convert { amount, from, to }) = cli.command {
        let request = ConversionRequest {
            amount,
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        };
        return convert_once(&controller, request).await;
    }

    if !cli.quiet {
        print_banner(&BannerInfo {
            provider: controller.provider_name(),
            base_url: &base_url,
            race_mode: controller.race_mode(),
            timeout,
        });
    }

    let spinner = follow_loading(controller.subscribe());
    let registry = CommandRegistry::new();

    // REPL: async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nquickfx> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let before = controller.state().generation();
        let info = SessionInfo {
            provider: controller.provider_name(),
            base_url: &base_url,
            race_mode: controller.race_mode(),
            timeout,
            stats: controller.stats(),
            controller: Some(&controller),
        };

        match registry.dispatch(line, &info).await {
            CommandResult::Quit => break,
            CommandResult::Handled => {}
            CommandResult::StateChanged(StateChange::RaceMode(mode)) => {
                controller.set_race_mode(mode);
            }
            CommandResult::NotACommand => match parse_line(line) {
                Ok(Edit::Field(field, value)) => {
                    controller.set_field(field, &value);
                }
                Ok(Edit::Form(request)) => {
                    controller.submit(request);
                }
                Err(e) => {
                    eprintln!("  ✗ {e}");
                    continue;
                }
            },
        }

        if controller.state().generation() != before {
            show_when_settled(&controller).await;
        }
    }

    controller.shutdown();
    spinner.abort();
    print_session_summary(controller.stats());
    Ok(())
}

/// Wait for in-flight requests, then print the result area.
/// Ctrl+C stops waiting; the requests keep running in the background.
async fn show_when_settled(controller: &Controller) {
    tokio::select! {
        _ = controller.settle() => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\n\ninterrupted");
            return;
        }
    }

    let view = controller.view();
    if view != View::Empty {
        println!("=> {view}");
    }
}

async fn convert_once(controller: &Controller, request: ConversionRequest) -> anyhow::Result<()> {
    let skip = match plan(&request) {
        Plan::Skip(reason) => Some(reason),
        _ => None,
    };

    controller.submit(request);
    tokio::select! {
        _ = controller.settle() => {}
        _ = tokio::signal::ctrl_c() => bail!("interrupted"),
    }

    match controller.view() {
        View::Result(line) => {
            println!("{line}");
            Ok(())
        }
        View::Error(message) => bail!("{message}"),
        View::Loading => bail!("conversion did not finish"),
        View::Empty => match skip {
            Some(reason) => bail!("nothing to convert: {reason}"),
            None => bail!("nothing to convert"),
        },
    }
}
