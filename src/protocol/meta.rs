// Generated from schema/meta.json. Do not edit by hand.
// Schema ref: refs/tags/v0.10.8

/// Protocol metadata
pub struct ProtocolMeta;

impl ProtocolMeta {
    /// ACP protocol version
    pub const VERSION: u16 = 1;
}

/// Methods that agents handle
pub struct AgentMethods;

impl AgentMethods {
    pub const AUTHENTICATE: &'static str = "authenticate";
    pub const INITIALIZE: &'static str = "initialize";
    pub const SESSION_CANCEL: &'static str = "session/cancel";
    pub const SESSION_LOAD: &'static str = "session/load";
    pub const SESSION_NEW: &'static str = "session/new";
    pub const SESSION_PROMPT: &'static str = "session/prompt";
    pub const SESSION_SET_CONFIG_OPTION: &'static str = "session/set_config_option";
    pub const SESSION_SET_MODE: &'static str = "session/set_mode";
}

/// Methods that clients handle
pub struct ClientMethods;

impl ClientMethods {
    pub const FS_READ_TEXT_FILE: &'static str = "fs/read_text_file";
    pub const FS_WRITE_TEXT_FILE: &'static str = "fs/write_text_file";
    pub const SESSION_REQUEST_PERMISSION: &'static str = "session/request_permission";
    pub const SESSION_UPDATE: &'static str = "session/update";
    pub const TERMINAL_CREATE: &'static str = "terminal/create";
    pub const TERMINAL_KILL: &'static str = "terminal/kill";
    pub const TERMINAL_OUTPUT: &'static str = "terminal/output";
    pub const TERMINAL_RELEASE: &'static str = "terminal/release";
    pub const TERMINAL_WAIT_FOR_EXIT: &'static str = "terminal/wait_for_exit";
}
