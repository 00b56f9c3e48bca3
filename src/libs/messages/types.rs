#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIG MESSAGES ===
    ConfigModuleMonitor,
    ConfigModuleServer,
    ConfigModuleExtension,
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,

    // === WATCH MESSAGES ===
    MonitorStarted(String), // session id
    MonitorStopped,
    WatcherReceivedCtrlC,
    WatcherReceivedSigterm,
    WatcherReadingStdin,
    InvalidSignal(String), // parse error
    TabHidden,
    TabVisible,
    FocusLostNotice,
    FocusRegained,
    ElapsedTime(String, String), // total, active
    InputListenerFailed(String), // error message
    EngagementScore(f64),
    SessionSaved(String),        // path
    SessionSaveFailed(String),   // error message

    // === RECORDING MESSAGES ===
    ApiClientFailed(String),     // error message
    ApiSessionStarted(String),   // server session id
    ApiSessionFailed(String),    // error message
    ApiSessionEndFailed(String), // error message
    RecordingSummary(usize, usize), // sent, failed

    // === STATS MESSAGES ===
    NoSavedSession,
    LastSessionHeader(String), // session id

    // === SCORE MESSAGES ===
    AttentionScore(f64),
    EngagementScoreHeader,

    // === EXTENSION HOST MESSAGES ===
    HostStarted,
    HostInvalidRequest(String), // error message
    FocusNudge(String),         // nudge body

    // === PROMPTS ===
    PromptSelectModules,
    PromptTickInterval,
    PromptRecencyWindow,
    PromptHeartbeatEvery,
    PromptInputListener,
    PromptServerApiUrl,
    PromptServerAuthToken,
    PromptStudyMode,
    PromptBlockedSites,
}
