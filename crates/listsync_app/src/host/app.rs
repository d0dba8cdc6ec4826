use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use listsync_core::trigger::{ScrollMetrics, TriggerEvent, TriggerSource, TriggerStrategy};
use listsync_core::{update, ListConfig, ListState, Msg, Ordering, ProcessContext};
use listsync_logging::sync_info;

use super::commands::{parse_command, HostCommand, HELP};
use super::effects::EffectRunner;
use super::render::{render_entities, render_status};
use super::HostEvent;
use crate::config::AppConfig;

/// Debouncers and trigger polling run on this cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Sentinel offset used when the sentinel is far below the viewport.
const OFFSCREEN_PX: i64 = i64::MAX;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();
    let runner = EffectRunner::new(config.fetch_settings(), host_tx.clone())?;
    let mut host = Host::new(&config.list, runner);

    spawn_stdin_reader(host_tx.clone());
    spawn_ticker(host_tx);

    println!("listsync: {} (type 'help' for commands)", config.backend_url);
    host.dispatch(Msg::Mounted);

    while let Ok(event) = host_rx.recv() {
        if !host.handle(event) {
            break;
        }
    }

    host.shutdown();
    Ok(())
}

struct Host {
    state: ListState,
    trigger: Box<dyn TriggerSource>,
    /// What `more` feeds the trigger: the bottom of the list came into view.
    bottom_event: TriggerEvent,
    runner: EffectRunner,
    printed: usize,
}

impl Host {
    fn new(config: &ListConfig, runner: EffectRunner) -> Self {
        let strategy = config.trigger_strategy();
        Self {
            state: config.initial_state(),
            trigger: strategy.build(),
            bottom_event: bottom_event(strategy),
            runner,
            printed: 0,
        }
    }

    /// Returns `false` once the host should exit.
    fn handle(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Input(HostCommand::Quit) => return false,
            HostEvent::Input(command) => self.apply_command(command),
            HostEvent::InputError(message) => eprintln!("{message}"),
            HostEvent::Msg(msg) => self.dispatch(msg),
            HostEvent::Tick => {
                let now = Instant::now();
                if self.trigger.poll(now) {
                    self.dispatch(Msg::LoadMoreRequested);
                }
                self.dispatch(Msg::Tick { now });
            }
        }
        true
    }

    fn apply_command(&mut self, command: HostCommand) {
        let now = Instant::now();
        match command {
            HostCommand::More => self.trigger.observe(self.bottom_event, now),
            HostCommand::Hide => self.trigger.observe(
                TriggerEvent::Sentinel {
                    offset_px: OFFSCREEN_PX,
                },
                now,
            ),
            HostCommand::Scroll(metrics) => {
                self.trigger.observe(TriggerEvent::Scroll(metrics), now)
            }
            HostCommand::Search(term) => self.dispatch(Msg::SearchInputChanged { term, at: now }),
            HostCommand::Order(key) => self.dispatch(Msg::OrderingChanged(
                key.as_deref().and_then(Ordering::parse),
            )),
            HostCommand::Process(id) => {
                self.dispatch(Msg::ProcessChanged(id.map(ProcessContext::new)))
            }
            HostCommand::Refresh => self.dispatch(Msg::RestartRequested),
            HostCommand::Show => {
                let view = self.state.view();
                println!("{}", render_status(&view));
                for line in render_entities(&view) {
                    println!("{line}");
                }
                self.printed = view.entities.len();
            }
            HostCommand::Help => println!("{HELP}"),
            HostCommand::Quit => {}
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let was_awaiting = self.state.is_awaiting_trigger();
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        // A signal swallowed by the in-flight guard gets another chance.
        if !was_awaiting && state.is_awaiting_trigger() {
            self.trigger.rearm(Instant::now());
        }
        if state.consume_dirty() {
            self.render(&state);
        }
        self.state = state;
    }

    /// Prints the status line and any entities not printed yet.
    fn render(&mut self, state: &ListState) {
        let view = state.view();
        if view.entities.len() < self.printed {
            self.printed = 0;
        }
        for line in render_entities(&view).into_iter().skip(self.printed) {
            println!("{line}");
        }
        self.printed = view.entities.len();
        println!("{}", render_status(&view));
    }

    fn shutdown(&mut self) {
        self.trigger.detach();
        self.dispatch(Msg::Unmounted);
        self.runner.stop();
        sync_info!("Host shut down after epoch {}", self.state.epoch());
    }
}

fn bottom_event(strategy: TriggerStrategy) -> TriggerEvent {
    match strategy {
        TriggerStrategy::Visibility { .. } => TriggerEvent::Sentinel { offset_px: 0 },
        TriggerStrategy::ScrollThreshold { .. } => TriggerEvent::Scroll(ScrollMetrics::default()),
    }
}

fn spawn_stdin_reader(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            let event = match parse_command(&line) {
                Ok(command) => HostEvent::Input(command),
                Err(message) => HostEvent::InputError(message),
            };
            if host_tx.send(event).is_err() {
                return;
            }
        }
        let _ = host_tx.send(HostEvent::Input(HostCommand::Quit));
    });
}

fn spawn_ticker(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        while host_tx.send(HostEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_event_fires_every_strategy() {
        let now = Instant::now();
        let strategies = [
            TriggerStrategy::Visibility {
                root_margin_px: 200,
            },
            TriggerStrategy::ScrollThreshold {
                buffer_px: 1100,
                debounce: Duration::ZERO,
            },
        ];
        for strategy in strategies {
            let mut trigger = strategy.build();
            trigger.observe(bottom_event(strategy), now);
            assert!(trigger.poll(now), "{strategy:?}");
        }
    }
}
