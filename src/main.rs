use clap::Parser;
use color_eyre::Result;
use std::time::Duration;

use settle::{DebounceHandle, DebounceOptions};

/// Debounced search demo
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Debounced search demo: type lines, watch bursts collapse into searches"
)]
struct Args {
    /// Quiet period in milliseconds before a search runs
    #[arg(long, default_value_t = 500)]
    wait: u64,

    /// Also search immediately on the first line of a burst
    #[arg(long)]
    leading: bool,

    /// Disable the trailing-edge search
    #[arg(long)]
    no_trailing: bool,

    /// Force a search at least every N milliseconds during sustained input
    #[arg(long, value_name = "MS")]
    max_wait: Option<u64>,
}

fn main() -> Result<()> {
    // Writes to /tmp/settle-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/settle-debug.log")
            .expect("Failed to open /tmp/settle-debug.log");

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();
    }

    color_eyre::install()?;
    let args = Args::parse();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let mut options = DebounceOptions::new()
        .leading(args.leading)
        .trailing(!args.no_trailing);
    if let Some(max_wait) = args.max_wait {
        options = options.max_wait(Duration::from_millis(max_wait));
    }
    log::debug!(
        "starting demo: wait={}ms options={:?}",
        args.wait,
        options
    );

    let search = DebounceHandle::spawn(
        |query: String| {
            println!("Searching for: {query}");
            query
        },
        Duration::from_millis(args.wait),
        options,
    )?;

    // Blocking stdin reads happen on a side thread; the async side owns
    // the debouncer and its timers
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let done = line.is_err();
            if tx.send(line).is_err() || done {
                break;
            }
        }
    });

    while let Some(line) = rx.recv().await {
        let line = line?;
        match line.trim() {
            "" => {}
            "/cancel" => {
                search.cancel();
                println!("Search cancelled");
            }
            "/flush" => {
                search.flush();
                println!("Search flushed (executed immediately)");
            }
            query => {
                search.call(query.to_string());
            }
        }
    }

    // EOF: run whatever is still pending before exiting
    search.flush();
    Ok(())
}
