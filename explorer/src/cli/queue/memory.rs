use clap::Args;

/// Parameters used to config the in-process relay.
#[derive(Debug, Clone, Args)]
pub struct InMemoryRelayCliArgs {
    /// Relay batches through an in-process queue. Nothing survives a restart.
    #[arg(long)]
    pub in_memory_relay: bool,

    /// Receives allowed before a message is dead-lettered.
    #[arg(env = "EXPLORER_IN_MEMORY_RELAY_MAX_RECEIVE_COUNT", long, default_value = "5")]
    pub in_memory_max_receive_count: u32,
}
