//! Terminal front end: one toggle, two readouts

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mic_visualizer::lifecycle::{run_frames, Command, IntervalClock};
use mic_visualizer::spectrum::WindowType;
use mic_visualizer::{AnalyzerConfig, CpalAcquirer, LifecycleController, Readout, RecordingState};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};

/// Window applied to each frame before the FFT
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum WindowArg {
    Blackman,
    Hann,
    Hamming,
    Rectangular,
}

impl From<WindowArg> for WindowType {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Blackman => WindowType::Blackman,
            WindowArg::Hann => WindowType::Hann,
            WindowArg::Hamming => WindowType::Hamming,
            WindowArg::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "mic-visualizer")]
#[command(about = "Live microphone loudness and dominant frequency", long_about = None)]
struct Args {
    /// Samples per analysis frame (power of two, 32-32768)
    #[arg(long, value_name = "SAMPLES", default_value_t = 2048)]
    window_size: usize,

    /// Spectral window
    #[arg(long, value_enum, default_value_t = WindowArg::Blackman)]
    window: WindowArg,

    /// Spectral smoothing between frames (0 = none, 1 = frozen)
    #[arg(long, value_name = "TAU", default_value_t = 0.8)]
    smoothing: f64,

    /// Level mapped to the bottom of the magnitude range
    #[arg(long, value_name = "DB", default_value_t = -100.0, allow_hyphen_values = true)]
    min_db: f64,

    /// Level mapped to the top of the magnitude range
    #[arg(long, value_name = "DB", default_value_t = -30.0, allow_hyphen_values = true)]
    max_db: f64,

    /// Display refresh rate
    #[arg(long, value_name = "FPS", default_value_t = 60.0)]
    fps: f64,

    /// Begin recording immediately instead of waiting for Enter
    #[arg(long)]
    start: bool,
}

impl Args {
    fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            window_size: self.window_size,
            window_type: self.window.into(),
            smoothing_time_constant: self.smoothing,
            min_decibels: self.min_db,
            max_decibels: self.max_db,
            ..Default::default()
        }
    }
}

fn button_label(state: RecordingState) -> &'static str {
    match state {
        RecordingState::Idle => "Start Recording",
        RecordingState::Recording => "Stop Recording",
    }
}

/// Forward stdin lines as commands: empty line toggles, `q` quits
fn spawn_stdin_reader(tx: Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let command = match line.as_deref().map(str::trim) {
                Ok("q") | Ok("quit") => Command::Quit,
                Ok(_) => Command::Toggle,
                Err(_) => break,
            };
            if tx.send(command).is_err() || command == Command::Quit {
                return;
            }
        }
        // EOF
        let _ = tx.send(Command::Quit);
    });
}

/// Terminal view: a state line on every transition, one live metrics line
///
/// The first write failure stops rendering and asks the frame loop to quit.
struct Screen {
    state: RecordingState,
    quit: Sender<Command>,
    error: Option<io::Error>,
}

impl Screen {
    fn present(&mut self, updates: &Receiver<Readout>, out: &mut impl Write) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.render(updates, out) {
            self.error = Some(e);
            let _ = self.quit.send(Command::Quit);
        }
    }

    fn render(&mut self, updates: &Receiver<Readout>, out: &mut impl Write) -> io::Result<()> {
        let mut latest = None;
        for readout in updates.try_iter() {
            if readout.state != self.state {
                self.state = readout.state;
                writeln!(out, "\n[{}]  (Enter to toggle, q to quit)", button_label(self.state))?;
            }
            latest = Some(readout);
        }

        if let Some(readout) = latest.filter(|r| r.state.is_recording()) {
            write!(
                out,
                "\rVolume: {:>3}%  Frequency: {:>5} Hz ",
                readout.metrics.loudness, readout.metrics.dominant_frequency_hz
            )?;
            out.flush()?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.analyzer_config();

    let (mut controller, updates) = LifecycleController::new(CpalAcquirer::new(), config)
        .context("Invalid analyser settings")?;

    let (tx, commands) = mpsc::channel();
    if args.start {
        tx.send(Command::Start).context("Command channel closed")?;
    }
    let quit = tx.clone();
    spawn_stdin_reader(tx);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "[{}]  (Enter to toggle, q to quit)", button_label(controller.state()))?;

    let mut clock = IntervalClock::new(args.fps);
    let mut screen = Screen {
        state: controller.state(),
        quit,
        error: None,
    };
    let frames = run_frames(&mut controller, &mut clock, &commands, |_| {
        screen.present(&updates, &mut out);
    });

    // Releases the microphone if still recording
    drop(controller);
    log::info!("Analysed {} frames", frames);

    if let Some(e) = screen.error {
        return Err(e).context("Failed to write to terminal");
    }
    writeln!(out)?;
    Ok(())
}
