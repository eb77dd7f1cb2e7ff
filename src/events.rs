//! Host events delivered to the UI thread.

use serde_json::Value;
use uuid::Uuid;

/// "Execution completed" notification for a single node, carrying the
/// opaque result payload produced by the host.
///
/// Events are drained once per frame. For each event the owning node's
/// panel handler runs first, then the app's own bookkeeping for the same
/// node (last-executed timestamps); that ordering is part of the
/// contract and nothing else hooks the event.
#[derive(Debug, Clone)]
pub struct ExecutionEvent {
    pub node_id: Uuid,
    pub payload: Value,
}
