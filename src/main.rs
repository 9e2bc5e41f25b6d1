// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use n64_pad_locator::{
    analysis::analyze,
    config::Config,
    memory::RamImage,
    mips::decode,
    utils::{self, logging},
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Finds the controller input word of a running N64 emulator", long_about = None)]
struct Args {
    /// Repeat for more output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Append log lines to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Use RUST_LOG instead of --verbose.
    #[arg(long, global = true)]
    env_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Attach to a running emulator and print the input word when it changes.
    Watch {
        /// Stop after this many seconds.
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Attach once and report where the RAM mirror lives.
    Locate,
    /// Run discovery over a raw RAM dump.
    Analyze {
        dump: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Disassemble words from a raw RAM dump.
    Disasm {
        dump: PathBuf,
        #[arg(value_parser = parse_number)]
        offset: usize,
        #[arg(default_value_t = 32)]
        count: usize,
    },
}

fn parse_number(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number {:?}: {}", s, e))
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("{} Failed to set up logging: {}", "[!]".red(), e);
    }

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> Result<()> {
    if args.env_log {
        logging::init_from_env();
        return Ok(());
    }
    let level = logging::level_from_verbosity(args.verbose);
    match &args.log_file {
        Some(path) => logging::init_file_logger(level, path)?,
        None => logging::init_logger(level)?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Watch { seconds } => watch(config, seconds.map(Duration::from_secs)),
        Command::Locate => locate(config),
        Command::Analyze { dump, output } => analyze_dump(&dump, output.as_deref()),
        Command::Disasm { dump, offset, count } => disasm(&dump, offset, count),
    }
}

fn load_dump(path: &Path) -> Result<RamImage> {
    println!("{} Loading dump: {}", "[*]".blue(), path.display());
    let image = RamImage::load(path).with_context(|| format!("reading {}", path.display()))?;
    println!("{} {} words loaded", "[+]".green(), image.len());
    Ok(image)
}

fn analyze_dump(path: &Path, output: Option<&Path>) -> Result<()> {
    let image = load_dump(path)?;
    let start = Instant::now();
    let result = analyze(&image).context("discovery failed")?;
    println!(
        "{} Controller input at RAM+{:#x} ({})",
        "[+]".green(),
        result.input_offset,
        utils::format_duration(start.elapsed())
    );

    let json = result.to_json()?;
    match output {
        Some(out) => {
            std::fs::write(out, &json)?;
            println!("{} Result saved to: {}", "[+]".green(), out.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn disasm(path: &Path, offset: usize, count: usize) -> Result<()> {
    let image = load_dump(path)?;
    let Some(words) = image.window(offset, count) else {
        bail!("words {:#x}..{:#x} are outside the dump", offset, offset + count);
    };
    for (i, &word) in words.iter().enumerate() {
        let text = match decode(word) {
            Ok(inst) => inst.to_string(),
            Err(e) => format!("{}", e).dimmed().to_string(),
        };
        println!("{}  {}", utils::format_word_row(offset + i, &[word]).cyan(), text);
    }
    Ok(())
}

#[cfg(any(target_os = "linux", windows))]
fn watch(config: Config, limit: Option<Duration>) -> Result<()> {
    use n64_pad_locator::engine::{PollingWorker, Session, WorkerState};
    use n64_pad_locator::memory::NativeIntrospection;
    use std::sync::Arc;

    config.validate()?;
    let poll = config.extract_interval();
    let session = Session::new(Arc::new(NativeIntrospection::new()), config);
    let mut worker = PollingWorker::start(session).context("starting poller")?;
    println!("{} Waiting for an emulator...", "[*]".blue());

    let started = Instant::now();
    let mut last_input = 0;
    let mut last_state = WorkerState::Searching;
    while limit.map_or(true, |l| started.elapsed() < l) {
        std::thread::sleep(poll);
        let state = worker.current_state();
        if state != last_state {
            println!("{} {}", "[*]".blue(), state);
            last_state = state;
        }
        let input = worker.current_input();
        if input != last_input {
            println!("{} {:08x}", "[+]".green(), input);
            last_input = input;
        }
    }
    worker.shutdown();
    Ok(())
}

#[cfg(any(target_os = "linux", windows))]
fn locate(config: Config) -> Result<()> {
    use n64_pad_locator::locator::RamLocator;
    use n64_pad_locator::memory::NativeIntrospection;
    use std::sync::Arc;

    config.validate()?;
    let locator = RamLocator::new(Arc::new(NativeIntrospection::new()), config);
    let Some(attachment) = locator.find_host()? else {
        bail!("no emulator process found");
    };
    println!(
        "{} Found {} (pid {})",
        "[+]".green(),
        attachment.host.process_name,
        attachment.pid
    );
    match locator.locate(&attachment)? {
        Some(base) => println!("{} RAM mirror at {}", "[+]".green(), base),
        None => println!("{} RAM mirror not found yet", "[-]".yellow()),
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", windows)))]
fn watch(_config: Config, _limit: Option<Duration>) -> Result<()> {
    bail!("process access is not supported on this platform")
}

#[cfg(not(any(target_os = "linux", windows)))]
fn locate(_config: Config) -> Result<()> {
    bail!("process access is not supported on this platform")
}
