use clap::Args;

/// Parameters used to config the in-process store.
#[derive(Debug, Clone, Args)]
pub struct InMemoryStoreCliArgs {
    /// Keep transactions and prices in process memory
    #[arg(long)]
    pub in_memory_store: bool,
}
