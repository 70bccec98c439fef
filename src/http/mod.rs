//! The HTTP/1.1 subset spoken by picohttpd.
//!
//! Bytes come in through [`connection`], are cut into requests by
//! [`parser`] (with [`target`] decoding the request target and [`headers`]
//! holding the header block), and leave as a [`response::Response`]
//! encoded by [`writer`]. [`mime`] picks content types for served files.
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitRequestLine │ ← Wait for the first CRLF
//!        └────────┬─────────┘
//!                 ▼
//!        ┌──────────────────┐
//!        │   AwaitHeaders   │ ← Wait for the blank line
//!        └────────┬─────────┘
//!                 │ Content-Length > 0
//!                 ▼
//!        ┌──────────────────┐
//!        │    AwaitBody     │ ← Wait for the declared body
//!        └────────┬─────────┘
//!                 ▼
//!        ┌──────────────────┐
//!        │     Dispatch     │ ← Route and build the response
//!        └────────┬─────────┘
//!                 ▼
//!        ┌──────────────────┐
//!        │     Respond      │ ← Write the encoded response
//!        └────────┬─────────┘
//!                 ├─ keep-alive → AwaitRequestLine
//!                 └─ close → Closed
//! ```
//!
//! A malformed request at any stage is answered with 400 and the
//! connection is closed.

pub mod connection;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod target;
pub mod writer;
