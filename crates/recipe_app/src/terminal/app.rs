use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, ErrorReporter, LogReporter};
use recipe_core::{update, AppState, Msg};
use recipe_engine::ApiSettings;

use super::effects::EffectRunner;
use super::input::{self, Command, HELP};
use super::render::Screen;

const TICK: Duration = Duration::from_millis(250);

/// Everything the main loop reacts to.
pub enum Inbound {
    Msg(Msg),
    Say(String),
    Quit,
}

pub fn run(settings: ApiSettings) -> anyhow::Result<()> {
    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbound>();
    let reporter: Arc<dyn ErrorReporter> = Arc::new(LogReporter);
    let effects = EffectRunner::new(settings, reporter, inbox_tx.clone())?;

    spawn_stdin_reader(inbox_tx);

    let mut prompt = Prompt {
        state: AppState::new(),
        screen: Screen::new(),
        effects,
        out: io::stdout(),
    };
    prompt.dispatch(Msg::Started)?;

    loop {
        match inbox_rx.recv_timeout(TICK) {
            Ok(Inbound::Msg(msg)) => prompt.dispatch(msg)?,
            Ok(Inbound::Say(text)) => prompt.say(&text)?,
            Ok(Inbound::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => prompt.tick()?,
        }
    }

    engine_info!("Prompt closed");
    Ok(())
}

fn spawn_stdin_reader(inbox: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let inbound: Vec<Inbound> = match input::parse(&line) {
                Command::Quit => vec![Inbound::Quit],
                Command::Help => vec![Inbound::Say(HELP.to_string())],
                Command::Invalid(reason) => vec![Inbound::Say(format!("{reason} (:help)"))],
                command => command.into_msgs().into_iter().map(Inbound::Msg).collect(),
            };
            for item in inbound {
                if inbox.send(item).is_err() {
                    return;
                }
            }
        }
        let _ = inbox.send(Inbound::Quit);
    });
}

struct Prompt {
    state: AppState,
    screen: Screen,
    effects: EffectRunner,
    out: io::Stdout,
}

impl Prompt {
    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let redraw = state.consume_dirty();
        self.state = state;
        self.effects.enqueue(effects);

        if redraw {
            let text = self.screen.draw(&self.state.view());
            let mut out = self.out.lock();
            writeln!(out)?;
            write!(out, "{text}")?;
            out.flush()?;
        }
        Ok(())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    fn tick(&mut self) -> io::Result<()> {
        self.dispatch(Msg::Tick)?;
        if let Some(dot) = self.screen.tick(&self.state.view()) {
            let mut out = self.out.lock();
            write!(out, "{dot}")?;
            out.flush()?;
        }
        Ok(())
    }
}
