//! Skyfall terminal entry point
//!
//! Parses the command line, sets up logging and the leaderboard, then runs the
//! 60 Hz loop in the terminal (or headless with the autopilot).

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};
use env_logger::{Env, Target};

use skyfall::clock::{FrameClock, unix_millis};
use skyfall::consts::LEADERBOARD_ROWS;
use skyfall::platform::{TerminalPainter, input, storage};
use skyfall::{FrameInput, LeaderboardMode, Settings, ViewMachine, leaderboard};

#[derive(Parser, Debug)]
#[command(name = "skyfall")]
#[command(version, about = "Fall through the sky, grab clouds, dodge helicopters")]
struct Args {
    /// Settings file (defaults to the data directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Promotional mode: no names, no stored scores
    #[arg(long)]
    promo: bool,

    /// Let the autopilot play and skip through menus
    #[arg(long)]
    demo: bool,

    /// Leaderboard file
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Seed for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Run the autopilot without a terminal
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Write the effective settings file and exit
    #[arg(long)]
    write_settings: bool,
}

/// Log to a file; the terminal is busy being a game
fn init_logging(to_stderr: bool) {
    let env = Env::default().default_filter_or("info");
    if to_stderr {
        env_logger::Builder::from_env(env).init();
        return;
    }

    let path = storage::log_file();
    match open_log(&path) {
        Ok(file) => env_logger::Builder::from_env(env)
            .target(Target::Pipe(Box::new(file)))
            .init(),
        Err(e) => eprintln!("Logging disabled, cannot open {}: {}", path.display(), e),
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn load_settings(args: &Args) -> (Settings, PathBuf) {
    let path = args.settings.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&path);
    if args.promo {
        settings.leaderboard = LeaderboardMode::Promo;
    }
    if let Some(board) = &args.leaderboard {
        settings.leaderboard_path = Some(board.clone());
    }
    (settings, path)
}

fn game_loop<W: Write>(out: &mut W, machine: &mut ViewMachine, settings: &Settings) -> io::Result<()> {
    let mut clock = FrameClock::new(settings.target_fps);
    let mut painter = TerminalPainter::new()?;
    let mut events = Vec::with_capacity(input::MAX_EVENTS_PER_FRAME);

    loop {
        let dt = clock.tick();
        let (cols, rows) = terminal::size()?;
        painter.resize(cols, rows);
        input::drain(&mut events, painter.cols())?;

        machine.set_fps(clock.fps());
        let frame = machine.frame(FrameInput {
            events: &events,
            dt,
            now_ms: unix_millis(),
        });
        if frame.quit {
            log::info!("Quit requested");
            return Ok(());
        }

        painter.paint(out, &frame.commands)?;
        clock.wait_for_next_frame();
    }
}

fn run_terminal(machine: &mut ViewMachine, settings: &Settings) -> io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events where the terminal supports them
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("Keyboard release events: {}", keyboard_enhanced);

    let result = game_loop(&mut out, machine, settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run_headless(machine: &mut ViewMachine, settings: &Settings, frames: u64) {
    let dt = 1.0 / settings.target_fps.max(1) as f32;
    for _ in 0..frames {
        let frame = machine.frame(FrameInput {
            events: &[],
            dt,
            now_ms: unix_millis(),
        });
        if frame.quit {
            break;
        }
    }

    println!("{} after {} frames", machine.leaderboard().title(), frames);
    for (i, row) in machine
        .leaderboard()
        .top_scores(LEADERBOARD_ROWS)
        .iter()
        .enumerate()
    {
        match row.score {
            Some(score) => println!("{:>2}. {:<24} {:>6}", i + 1, leaderboard::display_name(&row.name), score),
            None => println!("    {}", row.name),
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.headless || args.write_settings);

    let (settings, settings_path) = load_settings(&args);
    if args.write_settings {
        settings.save(&settings_path)?;
        println!("Settings written to {}", settings_path.display());
        return Ok(());
    }

    log::info!("Skyfall starting (seed: {:?})", args.seed);
    let board = leaderboard::select(&settings);
    let mut machine =
        ViewMachine::new(board, &settings, args.seed).with_demo(args.demo || args.headless);

    if args.headless {
        run_headless(&mut machine, &settings, args.frames);
        Ok(())
    } else {
        run_terminal(&mut machine, &settings)
    }
}
