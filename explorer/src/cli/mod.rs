use clap::{ArgGroup, Parser, Subcommand};
use provider::aws::AWSConfigCliArgs;

pub mod block_source;
pub mod database;
pub mod instrumentation;
pub mod price;
pub mod provider;
pub mod queue;
pub mod server;
pub mod service;

#[derive(Parser, Debug)]
#[command(
    name = "explorer",
    about = "Block explorer - ingests new blocks and serves their transactions",
    long_about = "Subscribes to new block headers, relays each block's transactions through an ordered queue and \
    persists them for lookup by hash or address.\n\n\
    Quick Start:\n  \
    explorer run --ws-url ws://localhost:8546 --in-memory-relay --in-memory-store",
    after_help = "Examples:\n  \
    explorer setup --aws --aws-sqs --mongodb\n  \
    explorer run --ws-url wss://node.example/ws --aws --aws-sqs --mongodb"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ingestion pipeline and the read API
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
    /// Create the relay queues and the store indexes
    Setup {
        #[command(flatten)]
        setup_command: Box<SetupCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[clap(
    group(
        ArgGroup::new("relay")
            .args(&["aws_sqs", "in_memory_relay"])
            .required(true)
            .multiple(false)
    ),
    group(
        ArgGroup::new("store")
            .args(&["mongodb", "in_memory_store"])
            .required(true)
            .multiple(false)
    ),
)]
pub struct RunCmd {
    #[clap(flatten)]
    pub block_source_args: block_source::BlockSourceCliArgs,

    // AWS Config
    #[clap(flatten)]
    pub aws_config_args: AWSConfigCliArgs,

    // Relay
    #[clap(flatten)]
    pub aws_sqs_args: queue::aws_sqs::AWSSQSCliArgs,

    #[clap(flatten)]
    pub in_memory_relay_args: queue::memory::InMemoryRelayCliArgs,

    // Store
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    #[clap(flatten)]
    pub in_memory_store_args: database::memory::InMemoryStoreCliArgs,

    #[clap(flatten)]
    pub price_args: price::PriceCliArgs,

    #[clap(flatten)]
    pub service_args: service::ServiceCliArgs,

    #[clap(flatten)]
    pub server_args: server::ServerCliArgs,

    #[clap(flatten)]
    pub instrumentation_args: instrumentation::InstrumentationCliArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[clap(
    group(
        ArgGroup::new("provider")
            .args(&["aws"])
            .required(true)
            .multiple(false)
    ),
    group(
      ArgGroup::new("queue")
          .args(&["aws_sqs"])
          .required(true)
          .multiple(false)
          .requires("provider")
    ),
    group(
        ArgGroup::new("database")
            .args(&["mongodb"])
            .required(true)
            .multiple(false)
    ),
)]
pub struct SetupCmd {
    // AWS Config
    #[clap(flatten)]
    pub aws_config_args: AWSConfigCliArgs,

    // Queue
    #[clap(flatten)]
    pub aws_sqs_args: queue::aws_sqs::AWSSQSCliArgs,

    // Database
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,
}
