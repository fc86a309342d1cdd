use crate::models::peer::Peer;
use crate::stores::peer_pool::PeerPool;
use crate::utils::time::secs_to_millis;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Start,
    End,
    Pause,
    Synchronize,
    Transfer,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Start => "start",
            ActionKind::End => "end",
            ActionKind::Pause => "pause",
            ActionKind::Synchronize => "synchronize",
            ActionKind::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Get,
    Put,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferType::Get => "get",
            TransferType::Put => "put",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferProtocol {
    Tcp,
    Udp,
    Pipe,
    Socketpair,
}

impl fmt::Display for TransferProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferProtocol::Tcp => "tcp",
            TransferProtocol::Udp => "udp",
            TransferProtocol::Pipe => "pipe",
            TransferProtocol::Socketpair => "socketpair",
        })
    }
}

/// Opaque handle the graph layer attaches to an action (its vertex index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActionKey(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartAction {
    /// Seconds to wait before starting
    pub time: u64,
    pub server_port: u16,
    pub socks_proxy: Option<Peer>,
    pub peers: Arc<PeerPool>,
}

/// Termination predicates; zero means the predicate is unused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EndAction {
    pub time: u64,
    pub count: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PauseAction {
    pub time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferAction {
    pub transfer_type: TransferType,
    pub protocol: TransferProtocol,
    pub size: u64,
    pub peers: Option<Arc<PeerPool>>,
}

/// Transfer settings returned together by [`Action::transfer_parameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferParameters {
    pub transfer_type: TransferType,
    pub protocol: TransferProtocol,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionPayload {
    Start(StartAction),
    End(EndAction),
    Pause(PauseAction),
    Synchronize,
    Transfer(TransferAction),
}

/// A validated node of the traffic graph.
///
/// Built only through [`ActionFactory`](crate::actions::factory::ActionFactory),
/// so every field already satisfies its attribute's grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(flatten)]
    payload: ActionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<ActionKey>,
}

impl Action {
    pub(crate) fn new(payload: ActionPayload) -> Self {
        Self { payload, key: None }
    }

    pub fn kind(&self) -> ActionKind {
        match &self.payload {
            ActionPayload::Start(_) => ActionKind::Start,
            ActionPayload::End(_) => ActionKind::End,
            ActionPayload::Pause(_) => ActionKind::Pause,
            ActionPayload::Synchronize => ActionKind::Synchronize,
            ActionPayload::Transfer(_) => ActionKind::Transfer,
        }
    }

    pub fn payload(&self) -> &ActionPayload {
        &self.payload
    }

    pub fn key(&self) -> Option<ActionKey> {
        self.key
    }

    pub fn set_key(&mut self, key: ActionKey) {
        self.key = Some(key);
    }

    pub fn start_time_millis(&self) -> Option<u64> {
        match &self.payload {
            ActionPayload::Start(start) => Some(secs_to_millis(start.time)),
            _ => None,
        }
    }

    pub fn server_port(&self) -> Option<u16> {
        match &self.payload {
            ActionPayload::Start(start) => Some(start.server_port),
            _ => None,
        }
    }

    /// The SOCKS proxy of a start action, if one was configured
    pub fn socks_proxy(&self) -> Option<Peer> {
        match &self.payload {
            ActionPayload::Start(start) => start.socks_proxy,
            _ => None,
        }
    }

    pub fn pause_time_millis(&self) -> Option<u64> {
        match &self.payload {
            ActionPayload::Pause(pause) => Some(secs_to_millis(pause.time)),
            _ => None,
        }
    }

    pub fn end_time_millis(&self) -> Option<u64> {
        match &self.payload {
            ActionPayload::End(end) => Some(secs_to_millis(end.time)),
            _ => None,
        }
    }

    pub fn end_count(&self) -> Option<u64> {
        match &self.payload {
            ActionPayload::End(end) => Some(end.count),
            _ => None,
        }
    }

    pub fn end_size(&self) -> Option<u64> {
        match &self.payload {
            ActionPayload::End(end) => Some(end.size),
            _ => None,
        }
    }

    pub fn transfer_parameters(&self) -> Option<TransferParameters> {
        match &self.payload {
            ActionPayload::Transfer(transfer) => Some(TransferParameters {
                transfer_type: transfer.transfer_type,
                protocol: transfer.protocol,
                size: transfer.size,
            }),
            _ => None,
        }
    }

    /// Peer pool of a start action, or of a transfer that named its own peers
    pub fn peers(&self) -> Option<&Arc<PeerPool>> {
        match &self.payload {
            ActionPayload::Start(start) => Some(&start.peers),
            ActionPayload::Transfer(transfer) => transfer.peers.as_ref(),
            _ => None,
        }
    }
}
