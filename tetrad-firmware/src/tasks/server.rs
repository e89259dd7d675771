//! Control server task
//!
//! Serves one connection at a time: reads a request with a bounded
//! timeout, routes it to a command, hands the command to the main loop
//! and writes back the JSON reply. The server never touches the display.

use defmt::*;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::Write;

use tetrad_protocol::{
    encode_response, route, ApiCommand, ApiError, ApiReply, RequestError, RequestReader, Tagged,
    Ticket, MAX_REQUEST_SIZE,
};

use crate::channels::{API_REPLY, API_REQUESTS};

/// Socket receive chunk
const RX_CHUNK: usize = 256;

/// How long to wait for the main loop to answer
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Server settings taken from the device config
#[derive(Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
    pub read_timeout_ms: u32,
    pub default_duration_s: u32,
}

/// Control server task
#[embassy_executor::task]
pub async fn server_task(stack: Stack<'static>, config: ServerConfig) {
    stack.wait_config_up().await;
    info!("Control server listening on port {}", config.port);

    let mut rx_buffer = [0u8; MAX_REQUEST_SIZE];
    let mut tx_buffer = [0u8; MAX_REQUEST_SIZE];
    let mut reader = RequestReader::new();
    let mut ticket = Ticket::default();
    let read_timeout = Duration::from_millis(u64::from(config.read_timeout_ms));

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(read_timeout));

        if let Err(e) = socket.accept(config.port).await {
            warn!("Accept failed: {:?}", e);
            continue;
        }

        reader.reset();
        let reply = match read_request(&mut socket, &mut reader, read_timeout).await {
            Ok(()) => match reader.finish() {
                Ok(request) => {
                    let command = route(&request, config.default_duration_s);
                    debug!("{} {}", command.name(), request.path.as_str());
                    ticket = ticket.next();
                    dispatch(ticket, command).await
                }
                Err(e) => ApiReply::Error(e.into()),
            },
            Err(e) => ApiReply::Error(e.into()),
        };

        if let ApiReply::Error(e) = &reply {
            warn!("Request failed: {}", e.message());
        }

        let response = encode_response(&reply);
        if let Err(e) = socket.write_all(&response).await {
            warn!("Response write failed: {:?}", e);
        }
        let _ = socket.flush().await;
        socket.close();
    }
}

/// Read until the request is complete, the peer closes, or time runs out
///
/// A partial request is still handed to the parser; only a connection
/// that delivered nothing at all is an error.
async fn read_request(
    socket: &mut TcpSocket<'_>,
    reader: &mut RequestReader,
    timeout: Duration,
) -> Result<(), RequestError> {
    let deadline = Instant::now() + timeout;
    let mut chunk = [0u8; RX_CHUNK];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let read = match with_timeout(remaining, socket.read(&mut chunk)).await {
            Ok(Ok(n)) if n > 0 => n,
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => break,
        };
        if reader.feed(&chunk[..read])? {
            return Ok(());
        }
    }

    if reader.buffered().is_empty() {
        Err(RequestError::Empty)
    } else {
        Ok(())
    }
}

/// Hand a command to the main loop and wait for its reply
///
/// Replies to an earlier ticket are dropped. On timeout the command is
/// pulled back out of the channel if it was never taken.
async fn dispatch(ticket: Ticket, command: ApiCommand) -> ApiReply {
    API_REPLY.reset();

    let exchange = async {
        API_REQUESTS.send(Tagged::new(ticket, command)).await;
        loop {
            let reply = API_REPLY.wait().await;
            if reply.answers(ticket) {
                return reply.body;
            }
            debug!("Dropping stale reply {}", reply.ticket.number());
        }
    };

    match with_timeout(REPLY_TIMEOUT, exchange).await {
        Ok(reply) => reply,
        Err(_) => {
            API_REQUESTS.clear();
            ApiReply::Error(ApiError::Timeout)
        }
    }
}
