use clap::Args;
use url::Url;

/// Parameters used to config the block source.
#[derive(Debug, Clone, Args)]
pub struct BlockSourceCliArgs {
    /// Websocket endpoint of the node pushing new heads.
    #[arg(env = "EXPLORER_WS_URL", long)]
    pub ws_url: Option<Url>,

    /// Deadline in seconds for a single block fetch.
    #[arg(env = "EXPLORER_FETCH_TIMEOUT_SECONDS", long, default_value = "30")]
    pub fetch_timeout_seconds: u64,
}
