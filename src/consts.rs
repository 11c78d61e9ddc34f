pub mod panel_consts {
    //! Updates Panel Constants
    //!
    //! Default locations, element ids and user-facing strings, organized by
    //! functional area.

    // =============================================================================
    // SOURCE CONFIGURATION
    // =============================================================================

    /// Path of the primary API endpoint, resolved against the base URL.
    pub const API_PATH: &str = "/api/updates";

    /// Static feed files tried in order after the API, resolved against the base URL.
    pub const FALLBACK_PATHS: [&str; 4] = [
        "./data/updates.json",
        "/data/updates.json",
        "/maple-calc/data/updates.json",
        "/maple-calc/maple-calc/data/updates.json",
    ];

    /// Per-attempt request timeout (seconds)
    /// Total load latency is bounded by the sum over all attempted sources
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Longest slice of an error response body kept in an error message (characters)
    pub const ERROR_BODY_LIMIT: usize = 200;

    // =============================================================================
    // ELEMENTS
    // =============================================================================

    /// Id of the panel container element
    pub const PANEL_ID: &str = "updates-panel";

    /// Id of the scrollable content block inside the panel
    pub const CONTENT_ID: &str = "updates-content";

    /// Id of the toast element
    pub const TOAST_ID: &str = "updates-toast";

    /// Class marking the panel as open
    pub const OPEN_CLASS: &str = "open";

    // =============================================================================
    // NOTIFICATION
    // =============================================================================

    /// Persisted key for the current notification version.
    /// Bump the suffix to show the toast once more to everyone.
    pub const SEEN_KEY: &str = "updates_seen_v6";

    /// How long the toast stays visible (milliseconds)
    pub const TOAST_DISPLAY_MS: u64 = 4000;

    /// Maximum number of diagnostic events buffered for the printer
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// User-facing strings
    pub mod text {
        pub const PANEL_TITLE: &str = "Updates";
        pub const DISMISS: &str = "Close";
        pub const NO_UPDATES: &str = "No updates yet.";
        pub const TOAST_MESSAGE: &str = "New updates are ready. Open the updates panel to take a look!";
    }
}
