use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot},
    task::JoinHandle,
    time::Duration,
};

use crate::{
    config::{ConfigError, StationConfig, labels::FieldLabelEditor},
    core::{
        controller::{EntryController, PageController},
        effect::{Effect, InputEvent, Reply, ReplyBody, Request},
        lookup::LogLookup,
        session::EntrySession,
    },
    journal::{
        JournalEntry, JournalError, JournalEvent, SubmissionJournal, sqlite::SqliteJournal,
    },
    server::{LogServer, ServerError, ServerResult},
    types::{FieldId, KeyCode, PageMode, RequestKind},
};

use super::{band::spawn_band_poller, events::UiEvent};

const JOURNAL_QUEUE_BOUND: usize = 64;
const JOURNAL_BATCH_MAX: usize = 32;

static LAST_SESSION_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Journal(JournalError),
    ChannelClosed,
}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<JournalError> for RuntimeError {
    fn from(value: JournalError) -> Self {
        Self::Journal(value)
    }
}

pub struct StationHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<UiEvent>,
}

impl Clone for StationHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Input {
        input: InputEvent,
        resp: oneshot::Sender<()>,
    },
    Session {
        resp: oneshot::Sender<Option<EntrySession>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

enum JournalMsg {
    Append(JournalEntry),
    Shutdown {
        resp: oneshot::Sender<Result<(), JournalError>>,
    },
}

struct LoopCtx<S> {
    server: Arc<S>,
    events_tx: broadcast::Sender<UiEvent>,
    reply_tx: mpsc::UnboundedSender<Reply>,
    journal_tx: Option<mpsc::Sender<JournalMsg>>,
    timeout: Duration,
    session_id: u64,
}

/// Starts the entry loop, the band poller and the journal worker.
///
/// Must be called from within a tokio runtime.
pub fn spawn_station<S: LogServer>(
    server: Arc<S>,
    journal: Option<Box<dyn SubmissionJournal>>,
    config: StationConfig,
) -> Result<StationHandle, RuntimeError> {
    let mut page = build_page(&config)?;

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<UiEvent>(config.event_buffer.max(1));
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();

    let floor = match &journal {
        Some(journal) => journal.latest_session()?.map_or(0, |s| s.saturating_add(1)),
        None => 0,
    };
    let session_id = allocate_session_id(floor);

    let journal_tx = journal.map(|journal| {
        let (tx, rx) = mpsc::channel::<JournalMsg>(JOURNAL_QUEUE_BOUND);
        spawn_journal_worker(journal, rx, events_tx.clone());
        tx
    });

    let band_task = config.band_poll_interval().map(|period| {
        spawn_band_poller(
            Arc::clone(&server),
            period,
            config.request_timeout(),
            events_tx.clone(),
        )
    });

    let ctx = LoopCtx {
        server,
        events_tx: events_tx.clone(),
        reply_tx,
        journal_tx,
        timeout: config.request_timeout(),
        session_id,
    };
    tracing::info!(
        page = ?config.page,
        base_url = %config.base_url,
        session_id,
        "station runtime started"
    );

    tokio::spawn(async move {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if handle_command(cmd, &mut page, &ctx, band_task.as_ref()).await {
                        break;
                    }
                }
                Some(reply) = reply_rx.recv() => {
                    journal_outcome(&ctx, &reply);
                    let effects = page.apply_reply(reply);
                    run_effects(effects, &ctx);
                }
            }
        }
        if let Some(task) = band_task {
            task.abort();
        }
        tracing::info!("station runtime stopped");
    });

    Ok(StationHandle { cmd_tx, events_tx })
}

/// Opens the SQLite journal named by `config.journal_path`, if any.
pub fn open_journal(
    config: &StationConfig,
) -> Result<Option<Box<dyn SubmissionJournal>>, RuntimeError> {
    let Some(path) = &config.journal_path else {
        return Ok(None);
    };
    let journal = SqliteJournal::open(path)?;
    tracing::info!(path = %path.display(), "submission journal opened");
    Ok(Some(Box::new(journal)))
}

fn build_page(config: &StationConfig) -> Result<PageController, RuntimeError> {
    Ok(match config.page {
        PageMode::Contest => PageController::Contest(
            EntryController::new(config.layout.clone(), &config.initial_sequence_label)
                .map_err(ConfigError::from)?,
        ),
        PageMode::Defaults => PageController::Defaults(FieldLabelEditor::new()),
        PageMode::Log => PageController::Log(LogLookup::new()),
    })
}

impl StationHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events_tx.subscribe()
    }

    /// Applies `input` and returns once entry state reflects it.
    ///
    /// Requests triggered by the input are already in flight; their replies
    /// arrive later as events.
    pub async fn input(&self, input: InputEvent) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Input { input, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn key_up(
        &self,
        field: Option<FieldId>,
        key: KeyCode,
        text: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        self.input(InputEvent::KeyUp {
            field,
            key,
            text: text.into(),
        })
        .await
    }

    pub async fn focus_in(&self, field: FieldId) -> Result<(), RuntimeError> {
        self.input(InputEvent::FocusIn { field }).await
    }

    pub async fn blur(&self, field: FieldId, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.input(InputEvent::Blur {
            field,
            text: text.into(),
        })
        .await
    }

    pub async fn select(&self, field: FieldId, value: impl Into<String>) -> Result<(), RuntimeError> {
        self.input(InputEvent::Select {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn search(&self, call: impl Into<String>) -> Result<(), RuntimeError> {
        self.input(InputEvent::Search { call: call.into() }).await
    }

    /// Snapshot of the entry session; `None` off the contest page.
    pub async fn session(&self) -> Result<Option<EntrySession>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Session { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command<S: LogServer>(
    cmd: Command,
    page: &mut PageController,
    ctx: &LoopCtx<S>,
    band_task: Option<&JoinHandle<()>>,
) -> bool {
    match cmd {
        Command::Input { input, resp } => {
            let effects = page.handle_input(input);
            run_effects(effects, ctx);
            let _ = resp.send(());
        }
        Command::Session { resp } => {
            let _ = resp.send(page.session().cloned());
        }
        Command::Shutdown { resp } => {
            if let Some(task) = band_task {
                task.abort();
            }
            let out = if let Some(tx) = &ctx.journal_tx {
                let (done_tx, done_rx) = oneshot::channel();
                if tx.send(JournalMsg::Shutdown { resp: done_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    done_rx
                        .await
                        .map_err(|_| RuntimeError::ChannelClosed)
                        .and_then(|r| r.map_err(RuntimeError::from))
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

fn run_effects<S: LogServer>(effects: Vec<Effect>, ctx: &LoopCtx<S>) {
    for effect in effects {
        match effect {
            Effect::Ui(event) => {
                let _ = ctx.events_tx.send(event);
            }
            Effect::Dispatch(req) => {
                if let Request::SubmitLog { generation, record } = &req {
                    journal_append(
                        ctx,
                        *generation,
                        JournalEvent::Dispatched {
                            record: record.clone(),
                        },
                    );
                }
                dispatch(ctx, req);
            }
        }
    }
}

fn dispatch<S: LogServer>(ctx: &LoopCtx<S>, req: Request) {
    let server = Arc::clone(&ctx.server);
    let reply_tx = ctx.reply_tx.clone();
    let timeout = ctx.timeout;
    tokio::spawn(async move {
        let outcome = tokio::time::timeout(timeout, perform(server.as_ref(), &req))
            .await
            .map_err(ServerError::from)
            .and_then(|r| r);
        let reply = match outcome {
            Ok(body) => Reply::ok(&req, body),
            Err(err) => Reply::failed(&req, err),
        };
        let _ = reply_tx.send(reply);
    });
}

async fn perform<S: LogServer>(server: &S, req: &Request) -> ServerResult<ReplyBody> {
    match req {
        Request::CheckDupe { call, .. } => {
            let reply = server.check_dupe(call).await?;
            Ok(ReplyBody::Dupe {
                call: call.clone(),
                reply,
            })
        }
        Request::SubmitLog { record, .. } => Ok(ReplyBody::Logged(server.submit_log(record).await?)),
        Request::Keyer { event } => Ok(ReplyBody::Keyed(server.send_key(event).await?)),
        Request::CallSearch { call, .. } => Ok(ReplyBody::CallSearch(server.call_search(call).await?)),
        Request::Connection { call, .. } => Ok(ReplyBody::Connection(server.connection(call).await?)),
    }
}

fn journal_outcome<S>(ctx: &LoopCtx<S>, reply: &Reply) {
    if reply.kind != RequestKind::Submission {
        return;
    }
    let event = match &reply.outcome {
        Ok(ReplyBody::Logged(msg)) => JournalEvent::Answered {
            message: msg.message.clone(),
        },
        Ok(other) => JournalEvent::Failed {
            detail: format!("unexpected reply {other:?}"),
        },
        Err(err) => JournalEvent::Failed {
            detail: err.to_string(),
        },
    };
    journal_append(ctx, reply.generation, event);
}

fn journal_append<S>(ctx: &LoopCtx<S>, generation: u64, event: JournalEvent) {
    let Some(tx) = &ctx.journal_tx else {
        return;
    };
    let entry = JournalEntry {
        session: ctx.session_id,
        generation,
        ts_ms: now_ms(),
        event,
    };
    if let Err(err) = tx.try_send(JournalMsg::Append(entry)) {
        tracing::warn!(%err, "journal queue rejected entry");
        let _ = ctx.events_tx.send(UiEvent::RequestFailed {
            kind: RequestKind::Journal,
            detail: format!("journal queue error: {err}"),
        });
    }
}

fn spawn_journal_worker(
    journal: Box<dyn SubmissionJournal>,
    mut rx: mpsc::Receiver<JournalMsg>,
    events_tx: broadcast::Sender<UiEvent>,
) {
    let journal = Arc::new(Mutex::new(journal));
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let (mut buf, mut shutdown) = match msg {
                JournalMsg::Append(entry) => (vec![entry], None),
                JournalMsg::Shutdown { resp } => (Vec::new(), Some(resp)),
            };
            while shutdown.is_none() && buf.len() < JOURNAL_BATCH_MAX {
                match rx.try_recv() {
                    Ok(JournalMsg::Append(entry)) => buf.push(entry),
                    Ok(JournalMsg::Shutdown { resp }) => shutdown = Some(resp),
                    Err(_) => break,
                }
            }

            let written = write_entries(&journal, buf, shutdown.is_some()).await;
            if let Err(err) = &written {
                tracing::warn!(%err, "journal write failed");
                let _ = events_tx.send(UiEvent::RequestFailed {
                    kind: RequestKind::Journal,
                    detail: err.to_string(),
                });
            }
            if let Some(resp) = shutdown {
                let _ = resp.send(written);
                break;
            }
        }
    });
}

async fn write_entries(
    journal: &Arc<Mutex<Box<dyn SubmissionJournal>>>,
    entries: Vec<JournalEntry>,
    call_flush: bool,
) -> Result<(), JournalError> {
    let journal = Arc::clone(journal);
    tokio::task::spawn_blocking(move || {
        let mut journal = journal.blocking_lock();
        journal.append(&entries)?;
        if call_flush {
            journal.flush()?;
        }
        Ok::<(), JournalError>(())
    })
    .await
    .map_err(|e| JournalError::Message(format!("join error: {e}")))?
}

/// Journal session id: the current time in ms, raised above `floor` and above
/// every id handed out earlier in this process.
fn allocate_session_id(floor: u64) -> u64 {
    let candidate = now_ms().max(floor);
    let prev = LAST_SESSION_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(candidate.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    candidate.max(prev.saturating_add(1))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
