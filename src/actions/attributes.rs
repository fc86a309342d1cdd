use crate::actions::factory::ActionFactory;
use crate::core::error::ActionError;
use crate::models::action::Action;
use crate::validation::resolver::HostResolver;
use serde::Deserialize;

/// Raw attributes of one graph node, exactly as written in the source document.
///
/// Absent attributes deserialize to empty strings, which is how the
/// constructors tell "missing" from "present".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionAttributes {
    /// Node kind: "start", "end", "pause", "synchronize" or "transfer"
    pub kind: String,

    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub serverport: String,

    #[serde(default)]
    pub peers: String,

    #[serde(default)]
    pub socksproxy: String,

    #[serde(default)]
    pub count: String,

    #[serde(default)]
    pub size: String,

    #[serde(default, rename = "type")]
    pub transfer_type: String,

    #[serde(default)]
    pub protocol: String,
}

impl ActionAttributes {
    /// Dispatch to the constructor for this node's kind
    pub fn build<R: HostResolver>(
        &self,
        factory: &ActionFactory<R>,
    ) -> Result<Action, ActionError> {
        let kind = self.kind.to_ascii_lowercase();

        match kind.as_str() {
            "start" => factory.new_start(
                &self.time,
                &self.serverport,
                &self.peers,
                &self.socksproxy,
            ),
            "end" => factory.new_end(&self.time, &self.count, &self.size),
            "pause" => factory.new_pause(&self.time),
            "synchronize" => Ok(factory.new_synchronize()),
            "transfer" => factory.new_transfer(
                &self.transfer_type,
                &self.protocol,
                &self.size,
                &self.peers,
            ),
            _ => Err(ActionError::UnknownAttribute(format!(
                "node has unknown action kind '{}', \
                 expected one of: 'start','end','pause','synchronize', or 'transfer'",
                self.kind
            ))),
        }
    }
}
