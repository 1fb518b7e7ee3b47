//! Tool host — exposes the gateway as tools over a JSON-RPC line protocol.

pub mod protocol;
pub mod tools;

#[cfg(feature = "server")]
pub mod stdio;

pub use protocol::{handle_line, handle_request, RpcError, RpcRequest, RpcResponse};
pub use tools::{ToolContent, ToolDescriptor, ToolHost, ToolResult};

#[cfg(feature = "server")]
pub use stdio::serve_stdio;
