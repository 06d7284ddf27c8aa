use crate::domain::{Role, Side};
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, paddle_offset};
use crate::interface_adapters::state::AppState;
use crate::use_cases::GameEvent;

use axum::{
    Error,
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, field, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    EventsClosed,
    AssignmentDropped,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        let span = info_span!("conn", conn_id = field::Empty, side = field::Empty);
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = ?e, "failed to bootstrap connection");
            let _ = socket.close().await;
            return;
        }
    };

    let span = tracing::Span::current();
    span.record("conn_id", ctx.conn_id);
    span.record("side", role_label(ctx.role));
    info!(conn_id = ctx.conn_id, side = role_label(ctx.role), "client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Player(side) => side.as_str(),
        Role::Spectator => "spectator",
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    pub conn_id: u64,
    pub role: Role,
    pub event_tx: mpsc::Sender<GameEvent>,
    // Snapshots queued by the world task for this socket.
    pub outbound_rx: mpsc::Receiver<Utf8Bytes>,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_invalid_input_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Register before the first tick can reach us; snapshots wait in the queue
    // until the assignment has gone out.
    let (outbound_tx, outbound_rx) = mpsc::channel::<Utf8Bytes>(state.outbound_capacity);
    let (reply_tx, reply_rx) = oneshot::channel();

    state
        .event_tx
        .send(GameEvent::Connect {
            outbound: outbound_tx,
            reply: reply_tx,
        })
        .await
        .map_err(|_| NetError::EventsClosed)?;
    let assignment = reply_rx.await.map_err(|_| NetError::AssignmentDropped)?;
    let conn_id = assignment.conn_id;

    let assignment_msg = ServerMessage::Assignment {
        side: assignment.role.into(),
    };
    let bytes_out = match send_message(socket, &assignment_msg).await {
        Ok(bytes) => bytes as u64,
        Err(e) => {
            // Registered but never usable; release the slot.
            let _ = state.event_tx.send(GameEvent::Disconnect { conn_id }).await;
            return Err(e);
        }
    };

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        conn_id,
        role: assignment.role,
        event_tx: state.event_tx.clone(),
        outbound_rx,

        msgs_in: 0,
        msgs_out: 1,
        bytes_in: 0,
        bytes_out,
        invalid_json: 0,

        last_input_full_log: now,
        last_invalid_input_log: now,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, ctx) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing Snapshot
            frame = ctx.outbound_rx.recv() => {
                match frame {
                    Some(bytes) => match forward_frame(bytes, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    None => {
                        // World task is gone; nothing more will be published.
                        fatal = Some(NetError::EventsClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let conn_id = ctx.conn_id;
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Move { side, y }) => process_move(ctx, side.into(), y),
                    Err(parse_err) => {
                        // Malformed input is dropped; the connection stays up.
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                conn_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }
                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                if should_log(&mut ctx.last_invalid_input_log) {
                    debug!(conn_id, "binary message ignored");
                }
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(conn_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(conn_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

fn process_move(ctx: &mut ConnCtx, side: Side, y: f64) -> Result<LoopControl, NetError> {
    let conn_id = ctx.conn_id;

    let Some(y) = paddle_offset(y) else {
        if should_log(&mut ctx.last_invalid_input_log) {
            warn!(conn_id, "non-finite paddle position; dropping");
        }
        return Ok(LoopControl::Continue);
    };

    if ctx.role == Role::Spectator {
        // Spectators cannot control paddles.
        if should_log(&mut ctx.last_invalid_input_log) {
            debug!(conn_id, "spectator move ignored");
        }
        return Ok(LoopControl::Continue);
    }

    match ctx.event_tx.try_send(GameEvent::Move { conn_id, side, y }) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!(conn_id, "event channel full; dropping move");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::EventsClosed),
    }
}

async fn forward_frame(frame: Utf8Bytes, socket: &mut WebSocket, ctx: &mut ConnCtx) -> LoopControl {
    let bytes_len = frame.len();
    match socket.send(Message::Text(frame)).await.map_err(NetError::Ws) {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Dropping the receiver afterwards makes the next broadcast purge us too.
            warn!(error = ?err, "failed to send snapshot");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &mut ConnCtx) -> Result<(), NetError> {
    let conn_id = ctx.conn_id;
    ctx.event_tx
        .send(GameEvent::Disconnect { conn_id })
        .await
        .map_err(|_| NetError::EventsClosed)?;

    debug!(
        conn_id,
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        "connection stats"
    );
    info!(conn_id, "client disconnected");
    Ok(())
}
