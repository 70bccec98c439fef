use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Encodes `resp` as it goes on the wire.
pub fn serialize_response(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    buf.put_slice(format!("{} {}\r\n", HTTP_VERSION, resp.status).as_bytes());

    for (name, value) in resp.headers.iter() {
        buf.put_slice(name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(b"\r\n");

    buf.put_slice(&resp.body);
    buf.freeze()
}

/// An encoded response plus how much of it the peer has accepted so far.
pub struct ResponseWriter {
    pending: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            pending: serialize_response(response),
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.pending.has_remaining() {
            let n = stream.write(self.pending.chunk()).await?;
            if n == 0 {
                anyhow::bail!("connection closed while writing");
            }
            self.pending.advance(n);
        }

        stream.flush().await?;
        Ok(())
    }
}
