use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;

use crate::handler::{self, HandlerError};
use crate::http::parser::{ParseError, RequestHead, parse_request_head, parse_request_line};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::ServerContext;

const READ_CHUNK: usize = 4096;

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    ctx: Arc<ServerContext>,
}

pub enum ConnectionState {
    AwaitRequestLine,
    AwaitHeaders,
    AwaitBody(RequestHead),
    Dispatch(Request),
    Respond(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

enum Fill {
    Data,
    Eof,
    TimedOut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::AwaitRequestLine,
            ctx,
        }
    }

    /// Drives the connection until the peer leaves, a response closes it,
    /// or writing fails.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitRequestLine => match parse_request_line(&self.buffer) {
                    Ok(_) => ConnectionState::AwaitHeaders,
                    Err(ParseError::Incomplete) => match self.fill_buffer().await? {
                        Fill::Data => ConnectionState::AwaitRequestLine,
                        // Idle between requests
                        Fill::Eof | Fill::TimedOut if self.buffer.is_empty() => {
                            ConnectionState::Closed
                        }
                        Fill::Eof | Fill::TimedOut => Self::reject(ParseError::Incomplete),
                    },
                    Err(e) => Self::reject(e),
                },

                ConnectionState::AwaitHeaders => match parse_request_head(&self.buffer) {
                    Ok((head, consumed)) => {
                        self.buffer.advance(consumed);

                        if head.content_length > self.ctx.max_body_bytes() {
                            Self::reject(ParseError::BodyTooLarge)
                        } else if head.content_length == 0 {
                            ConnectionState::Dispatch(head.into_request(Vec::new()))
                        } else {
                            ConnectionState::AwaitBody(head)
                        }
                    }
                    Err(ParseError::Incomplete) => match self.fill_buffer().await? {
                        Fill::Data => ConnectionState::AwaitHeaders,
                        Fill::Eof | Fill::TimedOut => Self::reject(ParseError::Incomplete),
                    },
                    Err(e) => Self::reject(e),
                },

                ConnectionState::AwaitBody(head) => {
                    if self.buffer.len() >= head.content_length {
                        let body = self.buffer.split_to(head.content_length).to_vec();
                        ConnectionState::Dispatch(head.into_request(body))
                    } else {
                        match self.fill_buffer().await? {
                            Fill::Data => ConnectionState::AwaitBody(head),
                            // Declared Content-Length never arrived
                            Fill::Eof | Fill::TimedOut => Self::reject(ParseError::Incomplete),
                        }
                    }
                }

                ConnectionState::Dispatch(req) => {
                    let (response, keep_alive) = self.dispatch(&req).await;
                    ConnectionState::Respond(ResponseWriter::new(&response), keep_alive)
                }

                ConnectionState::Respond(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        ConnectionState::AwaitRequestLine // go back for next request
                    } else {
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        Ok(())
    }

    async fn dispatch(&self, req: &Request) -> (Response, bool) {
        let (mut response, keep_alive) = match handler::handle(&self.ctx, req).await {
            Ok(response) => (response, req.keep_alive()),
            Err(HandlerError::Io(e)) => {
                tracing::error!(
                    method = %req.method,
                    path = %req.path,
                    error = format!("{:#}", e),
                    "Failed to serve request"
                );
                (Response::internal_error(), false)
            }
            Err(e) => (e.into_response(), req.keep_alive()),
        };

        tracing::info!(
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            "Request served"
        );

        response.headers.insert(
            "Connection",
            if keep_alive { "keep-alive" } else { "close" },
        );
        (response, keep_alive)
    }

    /// Answers a malformed request with 400 and closes afterwards.
    fn reject(err: ParseError) -> ConnectionState {
        tracing::warn!(error = %err, "Rejecting malformed request");

        let mut response = Response::bad_request(&err.to_string());
        response.headers.insert("Connection", "close");
        ConnectionState::Respond(ResponseWriter::new(&response), false)
    }

    /// Reads more bytes, giving up after the keep-alive timeout.
    async fn fill_buffer(&mut self) -> anyhow::Result<Fill> {
        self.buffer.reserve(READ_CHUNK);

        match timeout(
            self.ctx.keep_alive_timeout(),
            self.stream.read_buf(&mut self.buffer),
        )
        .await
        {
            Err(_) => Ok(Fill::TimedOut),
            Ok(Ok(0)) => Ok(Fill::Eof),
            Ok(Ok(_)) => Ok(Fill::Data),
            Ok(Err(e)) => Err(e.into()),
        }
    }
}
