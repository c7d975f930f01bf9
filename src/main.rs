use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use membar::app::App;
use membar::config::{self, Config, load_config, load_config_from_path};
use membar::event::{Event, EventHandler};
use membar::system::process::SortColumn;
use membar::system::sampler::ProcessSampler;
use membar::{logging, report, ui};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "membar",
    about = "Live memory, swap and top-process monitor"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Sort column: pid, memory, memory_bytes, virtual, cpu, command
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long, default_value_t = false)]
    ascending: bool,

    /// Print one snapshot and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// With --once, print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write JSON-lines logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli)?;

    if !config.logging.file.is_empty() {
        logging::init_file_logging(&PathBuf::from(&config.logging.file), &config.logging.level)?;
    }
    info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        sort = %config.general.default_sort,
        descending = config.general.descending,
        once = cli.once,
        "membar starting"
    );

    if cli.once {
        return run_once(&config, cli.json).await;
    }
    if cli.json {
        return Err(eyre!("--json only applies together with --once"));
    }

    // ratatui::init also installs a panic hook that restores the terminal.
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(config);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Sample => app.refresh_data(),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    Ok(())
}

/// Two samples one refresh interval apart, so CPU percentages are real.
async fn run_once(config: &Config, json: bool) -> Result<()> {
    let sort = SortColumn::from_str_config(&config.general.default_sort).unwrap_or_default();
    let descending = config.general.descending;

    let mut sampler = ProcessSampler::new();
    sampler.sample(sort, descending);
    tokio::time::sleep(Duration::from_millis(config.general.refresh_rate_ms)).await;
    let snapshot = sampler.sample(sort, descending);

    if json {
        println!("{}", report::render_json(&snapshot)?);
    } else {
        print!("{}", report::render_text(&snapshot));
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<config::Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        if SortColumn::from_str_config(sort).is_none() {
            return Err(eyre!(
                "unknown sort column `{sort}`; expected pid, memory, memory_bytes, virtual, cpu or command"
            ));
        }
        config.general.default_sort = sort.clone();
    }
    if cli.ascending {
        config.general.descending = false;
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = path.display().to_string();
    }
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("--refresh-rate must be greater than 0"));
    }

    Ok(config)
}
