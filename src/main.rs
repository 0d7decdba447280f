use anyhow::Context;
use clap::Parser;
use hub_stats::config::HubConfig;
use hub_stats::display::output::{
    display_error, display_summary, display_watching, TerminalSink,
};
use hub_stats::hub::StatsHub;
use hub_stats::refresh::{ReadyState, RefreshTrigger};
use hub_stats::store::file::FileStore;
use hub_stats::watch::{watch, StoreWatcher};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "Hub Stats")]
#[command(
    about = "Win rate, KDA, MVP% and rank progress from your stored match history",
    long_about = None
)]
struct Args {
    /// Directory holding the stored keys, one file per key (default: ~/.hub_stats)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Print the computed stats as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Keep running and re-render whenever a tracked key changes
    #[arg(short, long)]
    watch: bool,

    /// How often --watch checks the store, in milliseconds
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = HubConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let store = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "Cannot use {} as the data directory",
            config.data_dir.display()
        )
    })?;
    let hub = StatsHub::new(config, store);
    let json = args.json;

    let mut trigger = RefreshTrigger::new(&hub.config().keys);
    trigger.subscribe(|| refresh(&hub, json));
    trigger.boot(ReadyState::Complete);

    if !args.watch {
        return Ok(());
    }

    display_watching(hub.store().dir(), args.interval_ms);
    let mut watcher = StoreWatcher::new(&hub.config().keys, hub.store());
    watch(
        hub.store(),
        &mut watcher,
        &mut trigger,
        Duration::from_millis(args.interval_ms),
        None,
    );

    Ok(())
}

fn refresh(hub: &StatsHub<FileStore>, json: bool) {
    if json {
        match hub.compute().to_json() {
            Ok(out) => println!("{}", out),
            Err(e) => display_error(&e.to_string()),
        }
        return;
    }

    let config = hub.config();
    let mut sink = TerminalSink::new(&config.targets, &config.rank_table);
    let view = hub.compute_and_render(&mut sink);
    sink.print(&view);
    if view.metrics.total > 0 {
        display_summary(view.metrics.total, view.season.as_deref());
    }
}
