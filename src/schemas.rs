//! Bundled configuration schemas.
//!
//! `SharedLeaf` carries network server tuning, `SharedBeego` the HTTP
//! application settings, and `ServiceConfig` embeds both the way a game
//! service would.

use crate::configurable;
use serde::Serialize;

/// Network server tuning parameters.
///
/// Ports, queue lengths and message sizes are unsigned, so a negative number
/// in the file is reported as a malformed field and the default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedLeaf {
    #[serde(rename = "ListenIP")]
    pub listen_ip: String,
    pub listen_port: u16,

    // skeleton
    pub go_len: usize,
    pub timer_dispatcher_len: usize,
    #[serde(rename = "ChanRPCLen")]
    pub chan_rpc_len: usize,
    pub max_conn_num: usize,

    // gate
    pub pending_write_num: usize,
    /// Size of the message length header in bytes.
    pub len_msg_len: u32,
    pub min_msg_len: u32,
    pub max_msg_len: u32,

    /// Operations slower than this are logged.
    pub slow_op_threshold_ms: i64,
    /// Responses slower than this are logged.
    pub slow_response_ms: i64,
}

configurable! {
    SharedLeaf {
        leaf listen_ip: String { json: "ListenIP", env: "LISTEN_IP", default: "0.0.0.0" },
        leaf listen_port: u16 { json: "ListenPort", env: "LISTEN_PORT", default: "0" },
        leaf go_len: usize { json: "GoLen", default: "8000" },
        leaf timer_dispatcher_len: usize { json: "TimerDispatcherLen", default: "1000" },
        leaf chan_rpc_len: usize { json: "ChanRPCLen", default: "8000" },
        leaf max_conn_num: usize { json: "MaxConnNum", default: "5000" },
        leaf pending_write_num: usize { json: "PendingWriteNum", default: "1000" },
        leaf len_msg_len: u32 { json: "LenMsgLen", default: "2" },
        leaf min_msg_len: u32 { json: "MinMsgLen", default: "2" },
        leaf max_msg_len: u32 { json: "MaxMsgLen", default: "65535" },
        leaf slow_op_threshold_ms: i64 { json: "SlowOpThresholdMs", default: "20" },
        leaf slow_response_ms: i64 { json: "SlowResponseMs", default: "2000" },
    }
}

/// HTTP application parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedBeego {
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    pub app_name: String,
    pub run_mode: String,
}

configurable! {
    SharedBeego {
        leaf http_port: u16 { json: "HTTPPort", env: "HTTP_PORT", default: "8080" },
        leaf app_name: String { json: "AppName", env: "APP_NAME", default: "my_game" },
        leaf run_mode: String { json: "RunMode", env: "RUN_MODE", default: "dev" },
    }
}

/// A service embedding both schemas.
///
/// `leaf` has no JSON key, so its keys sit at the top level of the file;
/// `beego` lives under `"Beego"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub leaf: SharedLeaf,
    #[serde(rename = "Beego")]
    pub beego: SharedBeego,
}

configurable! {
    ServiceConfig {
        nested leaf: SharedLeaf {},
        nested beego: SharedBeego { json: "Beego" },
    }
}
