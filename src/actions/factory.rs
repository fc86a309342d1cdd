use crate::core::error::ActionError;
use crate::models::action::{
    Action, ActionPayload, EndAction, PauseAction, StartAction, TransferAction, TransferProtocol,
    TransferType,
};
use crate::stores::peer_pool::PeerPool;
use crate::validation::attributes::{parse_bytes, parse_decimal_u64, parse_peer, parse_peers};
use crate::validation::resolver::HostResolver;
use std::sync::Arc;
use tracing::debug;

/// Builds validated actions from raw attribute strings.
///
/// An empty attribute string means the attribute was absent from the node.
/// Every constructor either returns a complete action or the first
/// validation error it hit.
#[derive(Debug, Clone)]
pub struct ActionFactory<R> {
    resolver: R,
}

impl<R: HostResolver> ActionFactory<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn new_start(
        &self,
        time_str: &str,
        server_port_str: &str,
        peers_str: &str,
        socks_proxy_str: &str,
    ) -> Result<Action, ActionError> {
        if time_str.is_empty() {
            return Err(ActionError::missing("start", "time"));
        }
        if server_port_str.is_empty() {
            return Err(ActionError::missing("start", "serverport"));
        }
        if peers_str.is_empty() {
            return Err(ActionError::missing("start", "peers"));
        }

        let server_port = match u16::try_from(parse_decimal_u64(server_port_str)) {
            Ok(port) if port > 0 => port,
            _ => {
                return Err(ActionError::InvalidContent(format!(
                    "invalid value '{}' for start action attribute 'serverport', \
                     expected port number between 1 and 65535",
                    server_port_str
                )))
            }
        };

        let socks_proxy = if socks_proxy_str.is_empty() {
            None
        } else {
            parse_peer("socksproxy", socks_proxy_str, &self.resolver)?
        };

        let mut pool = PeerPool::new();
        parse_peers("peers", peers_str, &self.resolver, &mut pool)?;

        if pool.is_empty() {
            return Err(ActionError::InvalidContent(format!(
                "start action attribute 'peers' value '{}' contains no usable peers, \
                 expected at least one 'hostname:port' other than this host",
                peers_str
            )));
        }

        let start = StartAction {
            time: parse_decimal_u64(time_str),
            server_port,
            socks_proxy,
            peers: Arc::new(pool),
        };

        debug!(
            time = start.time,
            server_port = start.server_port,
            peers = start.peers.len(),
            socks_proxy = ?start.socks_proxy,
            "Created start action"
        );

        Ok(Action::new(ActionPayload::Start(start)))
    }

    /// Time, count and size are independent termination conditions, all optional.
    pub fn new_end(
        &self,
        time_str: &str,
        count_str: &str,
        size_str: &str,
    ) -> Result<Action, ActionError> {
        let size = if size_str.is_empty() {
            0
        } else {
            parse_bytes("size", size_str)?
        };

        let end = EndAction {
            time: parse_decimal_u64(time_str),
            count: parse_decimal_u64(count_str),
            size,
        };

        debug!(time = end.time, count = end.count, size = end.size, "Created end action");

        Ok(Action::new(ActionPayload::End(end)))
    }

    pub fn new_pause(&self, time_str: &str) -> Result<Action, ActionError> {
        if time_str.is_empty() {
            return Err(ActionError::missing("pause", "time"));
        }

        let pause = PauseAction {
            time: parse_decimal_u64(time_str),
        };

        debug!(time = pause.time, "Created pause action");

        Ok(Action::new(ActionPayload::Pause(pause)))
    }

    pub fn new_synchronize(&self) -> Action {
        Action::new(ActionPayload::Synchronize)
    }

    pub fn new_transfer(
        &self,
        type_str: &str,
        protocol_str: &str,
        size_str: &str,
        peers_str: &str,
    ) -> Result<Action, ActionError> {
        let transfer_type = if type_str.is_empty() {
            return Err(ActionError::missing("transfer", "type"));
        } else if type_str.eq_ignore_ascii_case("get") {
            TransferType::Get
        } else if type_str.eq_ignore_ascii_case("put") {
            TransferType::Put
        } else {
            return Err(unknown_transfer_value(type_str, "type"));
        };

        let protocol = if protocol_str.is_empty() {
            return Err(ActionError::missing("transfer", "protocol"));
        } else if protocol_str.eq_ignore_ascii_case("tcp") {
            TransferProtocol::Tcp
        } else if protocol_str.eq_ignore_ascii_case("udp") {
            TransferProtocol::Udp
        } else if protocol_str.eq_ignore_ascii_case("pipe") {
            TransferProtocol::Pipe
        } else if protocol_str.eq_ignore_ascii_case("socketpair") {
            TransferProtocol::Socketpair
        } else {
            return Err(unknown_transfer_value(protocol_str, "protocol"));
        };

        if size_str.is_empty() {
            return Err(ActionError::missing("transfer", "size"));
        }
        let size = parse_bytes("size", size_str)?;

        let peers = if peers_str.is_empty() {
            None
        } else {
            let mut pool = PeerPool::new();
            parse_peers("peers", peers_str, &self.resolver, &mut pool)?;
            Some(Arc::new(pool))
        };

        debug!(
            transfer_type = %transfer_type,
            protocol = %protocol,
            size = size,
            peers = peers.as_ref().map_or(0, |p| p.len()),
            "Created transfer action"
        );

        Ok(Action::new(ActionPayload::Transfer(TransferAction {
            transfer_type,
            protocol,
            size,
            peers,
        })))
    }
}

fn unknown_transfer_value(value: &str, attribute: &str) -> ActionError {
    ActionError::UnknownAttribute(format!(
        "transfer action has unknown value '{}' for '{}' attribute",
        value, attribute
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::models::action::{ActionKind, TransferParameters};
    use crate::models::peer::Peer;
    use crate::validation::resolver::StaticResolver;
    use std::net::Ipv4Addr;

    fn factory() -> ActionFactory<StaticResolver> {
        ActionFactory::new(
            StaticResolver::new(Some("self-node"))
                .with_host("server1", Ipv4Addr::new(11, 0, 0, 1))
                .with_host("proxy", Ipv4Addr::new(12, 0, 0, 1)),
        )
    }

    #[test]
    fn test_start_action() {
        let action = factory()
            .new_start("10", "8080", "localhost:9000,127.0.0.1:9001", "")
            .unwrap();

        assert_eq!(action.kind(), ActionKind::Start);
        assert_eq!(action.server_port(), Some(8080));
        assert_eq!(action.start_time_millis(), Some(10_000));
        assert_eq!(action.socks_proxy(), None);
        assert_eq!(action.key(), None);

        let peers = action.peers().unwrap();
        assert_eq!(peers.len(), 2);
        assert!(peers.contains(&Peer::new(Ipv4Addr::LOCALHOST, 9000)));
        assert!(peers.contains(&Peer::new(Ipv4Addr::LOCALHOST, 9001)));
    }

    #[test]
    fn test_start_action_with_socks_proxy() {
        let action = factory()
            .new_start("0", "8080", "server1:80", "proxy:1080")
            .unwrap();

        assert_eq!(
            action.socks_proxy(),
            Some(Peer::new(Ipv4Addr::new(12, 0, 0, 1), 1080))
        );
    }

    #[test]
    fn test_start_socks_proxy_on_own_host_is_skipped() {
        let action = factory()
            .new_start("0", "8080", "server1:80", "SELF-NODE:1080")
            .unwrap();
        assert_eq!(action.socks_proxy(), None);
        assert_eq!(action.peers().unwrap().len(), 1);
    }

    #[test]
    fn test_start_socks_proxy_port_zero_kept() {
        let action = factory()
            .new_start("0", "8080", "server1:80", "proxy:0")
            .unwrap();
        assert_eq!(
            action.socks_proxy(),
            Some(Peer::new(Ipv4Addr::new(12, 0, 0, 1), 0))
        );
    }

    #[test]
    fn test_start_socks_proxy_negative_port() {
        let err = factory()
            .new_start("0", "8080", "server1:80", "proxy:-1080")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("socksproxy"));
    }

    #[test]
    fn test_start_missing_attributes_in_order() {
        let err = factory().new_start("", "8080", "localhost:9000", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttribute);
        assert!(err.to_string().contains("'time'"));

        let err = factory().new_start("10", "", "", "").unwrap_err();
        assert!(err.to_string().contains("'serverport'"));

        let err = factory().new_start("10", "8080", "", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttribute);
        assert!(err.to_string().contains("'peers'"));
    }

    #[test]
    fn test_start_server_port_range() {
        let err = factory().new_start("10", "70000", "server1:80", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("serverport"));

        let err = factory().new_start("10", "0", "server1:80", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn test_start_bad_socks_proxy() {
        let err = factory()
            .new_start("10", "8080", "server1:80", "proxy")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("socksproxy"));
    }

    #[test]
    fn test_start_unresolvable_peer() {
        let err = factory()
            .new_start("10", "8080", "host-that-does-not-resolve:1000", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("host-that-does-not-resolve:1000"));
    }

    #[test]
    fn test_start_only_self_is_rejected() {
        let err = factory()
            .new_start("10", "8080", "self-node:9000", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("no usable peers"));
    }

    #[test]
    fn test_start_self_filtered_from_pool() {
        let action = factory()
            .new_start("10", "8080", "self-node:9000,server1:9000", "")
            .unwrap();
        let peers = action.peers().unwrap();
        assert_eq!(peers.len(), 1);
        assert!(peers.iter().all(Peer::is_usable));
    }

    #[test]
    fn test_end_action_with_size() {
        let action = factory().new_end("", "", "1 gb").unwrap();
        assert_eq!(action.kind(), ActionKind::End);
        assert_eq!(action.end_time_millis(), Some(0));
        assert_eq!(action.end_count(), Some(0));
        assert_eq!(action.end_size(), Some(1_000_000_000));
    }

    #[test]
    fn test_end_action_all_absent() {
        let action = factory().new_end("", "", "").unwrap();
        assert_eq!(action.end_time_millis(), Some(0));
        assert_eq!(action.end_count(), Some(0));
        assert_eq!(action.end_size(), Some(0));
    }

    #[test]
    fn test_end_action_bad_size() {
        let err = factory().new_end("60", "10", "ten").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn test_pause_action() {
        let action = factory().new_pause("30").unwrap();
        assert_eq!(action.kind(), ActionKind::Pause);
        assert_eq!(action.pause_time_millis(), Some(30_000));

        let err = factory().new_pause("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttribute);
        assert_eq!(err.to_string(), "pause action missing required attribute 'time'");
    }

    #[test]
    fn test_synchronize_action() {
        let action = factory().new_synchronize();
        assert_eq!(action.kind(), ActionKind::Synchronize);
        assert!(action.peers().is_none());
    }

    #[test]
    fn test_transfer_action_without_peers() {
        let action = factory().new_transfer("get", "tcp", "10 MiB", "").unwrap();
        assert_eq!(
            action.transfer_parameters(),
            Some(TransferParameters {
                transfer_type: TransferType::Get,
                protocol: TransferProtocol::Tcp,
                size: 10_485_760,
            })
        );
        assert!(action.peers().is_none());
    }

    #[test]
    fn test_transfer_action_with_peers() {
        let action = factory()
            .new_transfer("PUT", "SocketPair", "512", "server1:80,localhost:81")
            .unwrap();
        let params = action.transfer_parameters().unwrap();
        assert_eq!(params.transfer_type, TransferType::Put);
        assert_eq!(params.protocol, TransferProtocol::Socketpair);
        assert_eq!(action.peers().unwrap().len(), 2);
    }

    #[test]
    fn test_transfer_unknown_type() {
        let err = factory().new_transfer("send", "tcp", "1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
        assert!(err.to_string().contains("'send'"));
        assert!(err.to_string().contains("'type'"));
    }

    #[test]
    fn test_transfer_unknown_protocol() {
        let err = factory().new_transfer("get", "sctp", "1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
        assert!(err.to_string().contains("'protocol'"));
    }

    #[test]
    fn test_transfer_missing_attributes() {
        let err = factory().new_transfer("", "tcp", "1", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttribute);
        assert!(err.to_string().contains("'type'"));

        let err = factory().new_transfer("get", "", "1", "").unwrap_err();
        assert!(err.to_string().contains("'protocol'"));

        let err = factory().new_transfer("get", "udp", "", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttribute);
        assert!(err.to_string().contains("'size'"));
    }

    #[test]
    fn test_transfer_bad_size_suffix() {
        let err = factory().new_transfer("put", "tcp", "10 zb", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
        assert!(err.to_string().contains("suffix"));
    }

    #[test]
    fn test_transfer_bad_peer() {
        let err = factory()
            .new_transfer("get", "tcp", "1 kib", "server1:80,0.0.0.0:81")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn test_transfer_peers_may_filter_to_empty() {
        let action = factory()
            .new_transfer("get", "tcp", "1 kib", "self-node:80")
            .unwrap();
        assert!(action.peers().unwrap().is_empty());
    }
}
