mod config;
mod input;

use std::sync::Arc;

use agent::{AgentClient, AgentMode, AgentReply, Session};
use clap::Parser;
use compute::CameraDirective;
use formats::{DatasetId, H3Grid, HexGrid, PointRecord, RowNormalizer};
use layers::RenderList;
use scene::{Effect, Event};
use serde::Serialize;
use streaming::{
    DatasetLoader, FileTransport, HttpTransport, ProxyPrefix, RoutingTransport, SourceCatalog,
    Transport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config};
use crate::input::{Input, parse_input};

/// Everything the session loop reacts to.
enum Message {
    Line(String),
    InputClosed,
    Loaded {
        dataset: DatasetId,
        records: Vec<PointRecord>,
    },
    Reply(AgentReply),
}

/// JSON lines written to stdout for the rendering collaborator.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum Output<'a> {
    Reply { text: &'a str },
    Camera(&'a CameraDirective),
    Render(&'a RenderList),
    Snapshot(&'a agent::AgentRequest),
    Error { message: &'a str },
}

fn emit(output: Output<'_>) {
    match serde_json::to_string(&output) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("cannot serialize output: {e}"),
    }
}

/// Owns the channel ends and the collaborators effects are dispatched to.
struct Runtime {
    tx: mpsc::UnboundedSender<Message>,
    loader: Arc<DatasetLoader>,
    catalog: Arc<SourceCatalog>,
    agent: Option<AgentClient>,
    mode: AgentMode,
    in_flight: usize,
}

impl Runtime {
    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(dataset) => self.spawn_load(dataset),
                Effect::Frame(directive) => emit(Output::Camera(&directive)),
            }
        }
    }

    fn spawn_load(&mut self, dataset: DatasetId) {
        let candidates = self.catalog.candidates(&dataset);
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let report = loader.load(&dataset, &candidates).await;
            if tx
                .send(Message::Loaded {
                    dataset,
                    records: report.records,
                })
                .is_err()
            {
                debug!("session gone; dropping load result");
            }
        });
    }

    fn spawn_chat(&mut self, session: &Session, message: String) {
        let Some(client) = self.agent.clone() else {
            warn!("no agent endpoint configured");
            emit(Output::Reply {
                text: AgentReply::fallback().reply.as_str(),
            });
            return;
        };
        let request = session.agent_request(self.mode, message);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let reply = client.ask(&request).await;
            if tx.send(Message::Reply(reply)).is_err() {
                debug!("session gone; dropping agent reply");
            }
        });
    }
}

fn spawn_stdin(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Message::Line(line)).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
        let _ = tx.send(Message::InputClosed);
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(Args::parse())?;

    let grid: Arc<dyn HexGrid> = Arc::new(H3Grid::new());
    let remote: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.http_timeout)?);
    let transport = Arc::new(RoutingTransport::new(remote, Arc::new(FileTransport::new())));
    let mut loader = DatasetLoader::new(transport, RowNormalizer::new(grid.clone()));
    if let Some(prefix) = &config.proxy_prefix {
        info!("rewriting remote locators through {prefix}");
        loader = loader.with_rewrite(Arc::new(ProxyPrefix::new(prefix.clone())));
    }
    let agent = config
        .agent_url
        .as_ref()
        .map(|url| AgentClient::new(url.clone(), config.http_timeout))
        .transpose()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime {
        tx: tx.clone(),
        loader: Arc::new(loader),
        catalog: Arc::new(config.catalog),
        agent,
        mode: config.mode,
        in_flight: 0,
    };
    let mut session = Session::new(grid);

    for dataset in config.initial_loads {
        let effects = session.handle(Event::LoadRequested(dataset));
        runtime.dispatch(effects);
    }
    spawn_stdin(tx);

    let mut input_open = true;
    while let Some(message) = rx.recv().await {
        match message {
            Message::Loaded { dataset, records } => {
                runtime.in_flight = runtime.in_flight.saturating_sub(1);
                info!("{dataset}: {} record(s)", records.len());
                let effects = session.handle(Event::LoadCompleted { dataset, records });
                runtime.dispatch(effects);
            }
            Message::Reply(reply) => {
                runtime.in_flight = runtime.in_flight.saturating_sub(1);
                let (text, effects) = session.receive_reply(reply);
                emit(Output::Reply { text: &text });
                runtime.dispatch(effects);
            }
            Message::InputClosed => input_open = false,
            Message::Line(line) => match parse_input(&line) {
                Ok(Input::Empty) => {}
                Ok(Input::Quit) => break,
                Ok(Input::Load(dataset)) => {
                    let effects = session.handle(Event::LoadRequested(dataset));
                    runtime.dispatch(effects);
                }
                Ok(Input::Area(name)) => {
                    let effects = session.handle(Event::FocusNamedArea(name));
                    runtime.dispatch(effects);
                }
                Ok(Input::Camera(pose)) => {
                    let effects = session.handle(Event::CameraMoved(pose));
                    runtime.dispatch(effects);
                }
                Ok(Input::Locate(location)) => {
                    let effects = session.handle(Event::UserLocated(location));
                    runtime.dispatch(effects);
                }
                Ok(Input::Render) => emit(Output::Render(&session.render())),
                Ok(Input::Snapshot) => {
                    emit(Output::Snapshot(&session.agent_request(runtime.mode, "")))
                }
                Ok(Input::Commands(values)) => {
                    let effects = session.apply_json(&values);
                    runtime.dispatch(effects);
                }
                Ok(Input::Chat(text)) => runtime.spawn_chat(&session, text),
                Err(message) => emit(Output::Error { message: &message }),
            },
        }

        if !input_open && runtime.in_flight == 0 {
            break;
        }
    }

    session.handle(Event::Detached);
    info!("session closed");
    Ok(())
}
