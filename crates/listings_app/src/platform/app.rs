use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use listings_core::{update, AppState, CompanyId, Msg};
use listings_engine::EngineHandle;
use listings_logging::{listings_debug, listings_info};

use super::config::{ConsoleConfig, LoadMoreLabels};
use super::effects::EffectRunner;
use super::filters::FilterStore;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render;

/// Events consumed by the dispatch loop.
pub enum Inbox {
    Dispatch(Msg),
    Quit,
}

pub fn run_app(config: ConsoleConfig) -> anyhow::Result<()> {
    let engine =
        EngineHandle::new(config.backend.to_settings()).context("starting listings engine")?;

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(engine, inbox_tx.clone());

    println!("{HELP}");
    if let Some(company) = config.company.as_deref() {
        let _ = inbox_tx.send(Inbox::Dispatch(Msg::CompanySelected(CompanyId::new(company))));
    }
    spawn_input_reader(inbox_tx.clone());

    // Background tick, mirroring the render cadence of the dispatch loop.
    let tick_tx = inbox_tx;
    thread::spawn(move || {
        let interval = Duration::from_millis(250);
        while tick_tx.send(Inbox::Dispatch(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut dispatcher = Dispatcher::new(AppState::with_page_size(config.page_size), config.labels);
    while let Ok(event) = inbox_rx.recv() {
        match event {
            Inbox::Dispatch(msg) => dispatcher.dispatch(msg, &runner),
            Inbox::Quit => break,
        }
    }

    listings_info!("Console exiting");
    runner.shutdown();
    Ok(())
}

struct Dispatcher {
    state: AppState,
    labels: LoadMoreLabels,
    turn: u64,
}

impl Dispatcher {
    fn new(state: AppState, labels: LoadMoreLabels) -> Self {
        Self {
            state,
            labels,
            turn: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg, runner: &EffectRunner) {
        self.turn += 1;
        listings_logging::set_turn(self.turn);
        if !matches!(msg, Msg::Tick) {
            listings_debug!("Dispatching {:?}", msg);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;

        runner.enqueue(effects);
        if let Some(view) = view {
            let mut out = io::stdout().lock();
            for line in render(&view, &self.labels) {
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(out);
        }
    }
}

fn spawn_input_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let filters_tx = inbox.clone();
        let mut filters = FilterStore::new(move |snapshot| {
            let _ = filters_tx.send(Inbox::Dispatch(Msg::FiltersChanged(snapshot)));
        });

        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            let msg = match command {
                Command::Company(id) => Msg::CompanySelected(CompanyId::new(id)),
                Command::Filter { name, value } => {
                    filters.set(&name, &value);
                    continue;
                }
                Command::Unfilter(name) => {
                    filters.unset(&name);
                    continue;
                }
                Command::Reset => {
                    filters.reset();
                    continue;
                }
                Command::More => Msg::LoadMoreClicked,
                Command::Reload => Msg::ReloadClicked,
                Command::Bulk(action) => Msg::BulkActionClicked(action),
                Command::Show => Msg::RenderRequested,
                Command::Help => {
                    println!("{HELP}");
                    continue;
                }
                Command::Quit => break,
            };
            if inbox.send(Inbox::Dispatch(msg)).is_err() {
                return;
            }
        }
        let _ = inbox.send(Inbox::Quit);
    });
}
