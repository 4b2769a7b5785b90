//! `/channels` resource commands.
//!
//! ```
//! use asterisk_ari_tokio::commands::channels::{self, OriginateParams};
//!
//! let mut params = OriginateParams::new("PJSIP/100", "demo");
//! params.caller_id = Some("Reception <200>".into());
//! params.timeout = Some(30);
//! let cmd = channels::originate(&params).unwrap();
//! assert_eq!(cmd.uri(), "channels");
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    command::{escape_path_segment, AriCommand},
    error::AriResult,
};

fn channel_path(channel_id: &str, action: &str) -> String {
    format!("channels/{}/{}", escape_path_segment(channel_id), action)
}

/// Body of `POST /channels/create`: create a channel without dialing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    /// Endpoint to call, e.g. `PJSIP/alice`.
    pub endpoint: String,
    /// Stasis application to place the channel into.
    pub app: String,
    /// Comma-separated application arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_args: Option<String>,
    /// Unique id to assign to the channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Unique id for the second leg of a local channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_channel_id: Option<String>,
    /// Channel id of the originator, for linked id and codec selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator: Option<String>,
    /// Comma-separated format list, e.g. `ulaw,slin16`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<String>,
    /// Channel variables to set on creation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl CreateParams {
    /// Required fields only.
    pub fn new(endpoint: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            app: app.into(),
            app_args: None,
            channel_id: None,
            other_channel_id: None,
            originator: None,
            formats: None,
            variables: BTreeMap::new(),
        }
    }
}

/// Body of `POST /channels`: create a channel and dial it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginateParams {
    /// Endpoint to call.
    pub endpoint: String,
    /// Stasis application the answered channel enters.
    pub app: String,
    /// Comma-separated application arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_args: Option<String>,
    /// Unique id to assign to the channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Unique id for the second leg of a local channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_channel_id: Option<String>,
    /// Channel id of the originator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator: Option<String>,
    /// Comma-separated format list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<String>,
    /// Caller id presented to the callee, `Name <number>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
    /// Seconds to wait for an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Channel variables to set on creation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl OriginateParams {
    /// Required fields only.
    pub fn new(endpoint: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            app: app.into(),
            app_args: None,
            channel_id: None,
            other_channel_id: None,
            originator: None,
            formats: None,
            caller_id: None,
            timeout: None,
            variables: BTreeMap::new(),
        }
    }
}

/// Parameters of `POST /channels/{id}/variable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetChannelVarParams {
    /// Target channel.
    pub channel_id: String,
    /// Variable name; dialplan functions like `CALLERID(name)` are accepted.
    pub variable: String,
    /// New value. `None` unsets the variable.
    pub value: Option<String>,
}

/// Parameters of `POST /channels/{id}/play/{playbackId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayParams {
    /// Target channel.
    pub channel_id: String,
    /// Id for the new playback, used to control it afterwards.
    pub playback_id: String,
    /// Media URI, e.g. `sound:hello-world`.
    pub media: String,
    /// Language for the media, e.g. `en`.
    pub lang: Option<String>,
}

/// Create a channel without dialing it.
pub fn create(params: &CreateParams) -> AriResult<AriCommand> {
    AriCommand::post("channels/create").json_body(params)
}

/// Create a channel and place a call.
pub fn originate(params: &OriginateParams) -> AriResult<AriCommand> {
    AriCommand::post("channels").json_body(params)
}

/// Dial a channel created with [`create`]. `timeout` is in seconds.
pub fn dial(channel_id: &str, caller: &str, timeout: u32) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "dial"))
        .query("caller", caller)
        .query("timeout", timeout.to_string())
}

/// Set or unset a channel variable.
pub fn set_channel_var(params: &SetChannelVarParams) -> AriCommand {
    AriCommand::post(channel_path(&params.channel_id, "variable"))
        .query("variable", params.variable.as_str())
        .query_opt("value", params.value.as_deref())
}

/// Answer a channel.
pub fn answer(channel_id: &str) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "answer"))
}

/// Indicate ringing to a channel.
pub fn ring(channel_id: &str) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "ring"))
}

/// Stop ringing indication.
pub fn ring_stop(channel_id: &str) -> AriCommand {
    AriCommand::delete(channel_path(channel_id, "ring"))
}

/// Put a channel on hold.
pub fn hold(channel_id: &str) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "hold"))
}

/// Take a channel off hold.
pub fn unhold(channel_id: &str) -> AriCommand {
    AriCommand::delete(channel_path(channel_id, "hold"))
}

/// Start music on hold.
pub fn start_moh(channel_id: &str) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "moh"))
}

/// Stop music on hold.
pub fn stop_moh(channel_id: &str) -> AriCommand {
    AriCommand::delete(channel_path(channel_id, "moh"))
}

/// Play silence to a channel.
pub fn start_silence(channel_id: &str) -> AriCommand {
    AriCommand::post(channel_path(channel_id, "silence"))
}

/// Stop playing silence.
pub fn stop_silence(channel_id: &str) -> AriCommand {
    AriCommand::delete(channel_path(channel_id, "silence"))
}

/// Start a playback with a caller-chosen id.
pub fn play_with_id(params: &PlayParams) -> AriCommand {
    let path = format!(
        "channels/{}/play/{}",
        escape_path_segment(&params.channel_id),
        escape_path_segment(&params.playback_id)
    );
    AriCommand::post(path)
        .query("media", params.media.as_str())
        .query_opt("lang", params.lang.as_deref())
}

/// Hang up a channel. `reason` is an ARI hangup reason such as `normal`,
/// `busy` or `congestion`.
pub fn hangup(channel_id: &str, reason: &str) -> AriCommand {
    AriCommand::delete(format!("channels/{}", escape_path_segment(channel_id)))
        .query("reason", reason)
}
