//! Command line countdown which prints the formatted time on every tick.
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use clap::Parser;
use log::{info, warn};
use timer::{get_formatted_time, thread::TimerThread, timer::Timer, StdScheduler, TimerConfig};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(clap::Parser)]
#[command(about = "Runs a countdown or a count-up timer on the command line")]
pub struct Cli {
    #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
    start: i64,
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    end: i64,
    #[arg(short, long, default_value_t = 1, help = "Seconds per tick")]
    increment: i64,
    #[arg(long, help = "Never complete the timer")]
    infinite: bool,
    #[arg(long, default_value = ":")]
    separator: String,
    #[arg(short, long, help = "Enable debug output of the timer library")]
    verbose: bool,
}

fn main() {
    let cli_args = Cli::parse();
    let log_level = if cli_args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                std::thread::current().name().expect("thread is not named"),
                record.level(),
                message
            ))
        })
        .level(log_level)
        .chain(std::io::stdout())
        .apply()
        .unwrap();

    let completion_signal = Arc::new(AtomicBool::new(false));
    let completion_signal_timer = completion_signal.clone();
    let separator = cli_args.separator.clone();
    let cfg = TimerConfig::new(
        cli_args.start,
        cli_args.end,
        cli_args.increment,
        cli_args.infinite,
        false,
    );
    let timer = match Timer::new_with_callbacks(
        cfg,
        StdScheduler,
        Box::new(move |time: i64| info!("{}", get_formatted_time(time, &separator))),
        Box::new(move || completion_signal_timer.store(true, Ordering::Relaxed)),
    ) {
        Ok(timer) => timer,
        Err(e) => {
            warn!("invalid timer configuration: {}", e);
            std::process::exit(1);
        }
    };
    if timer.infinite() {
        info!("timer runs indefinitely, abort with Ctrl-C");
    }

    let timer_thread = TimerThread::spawn(timer, POLL_INTERVAL).expect("spawning thread failed");
    timer_thread.start().expect("starting timer failed");
    info!(
        "started at {}",
        get_formatted_time(cli_args.start, &cli_args.separator)
    );
    while !completion_signal.load(Ordering::Relaxed) {
        if timer_thread.is_finished() {
            warn!("timer thread terminated unexpectedly");
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
    match timer_thread.shutdown() {
        Ok(timer) => info!(
            "done at {}",
            get_formatted_time(timer.current_time(), &cli_args.separator)
        ),
        Err(e) => warn!("timer thread error: {}", e),
    }
}
