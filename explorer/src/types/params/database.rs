use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::cli::{RunCmd, SetupCmd};
use crate::ExplorerError;

#[derive(Debug, Clone)]
pub struct DatabaseArgs {
    pub connection_uri: String,
    pub database_name: String,
    pub transactions_collection: String,
}

impl TryFrom<MongoDBCliArgs> for DatabaseArgs {
    type Error = ExplorerError;
    fn try_from(args: MongoDBCliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            connection_uri: args
                .mongodb_connection_url
                .ok_or_else(|| ExplorerError::ConfigError("MongoDB connection url is required".to_string()))?,
            database_name: args
                .mongodb_database_name
                .ok_or_else(|| ExplorerError::ConfigError("MongoDB database name is required".to_string()))?,
            transactions_collection: args
                .mongodb_transactions_collection
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ExplorerError::ConfigError("Transactions collection name is required".to_string()))?,
        })
    }
}

impl TryFrom<SetupCmd> for DatabaseArgs {
    type Error = ExplorerError;
    fn try_from(setup_cmd: SetupCmd) -> Result<Self, Self::Error> {
        Self::try_from(setup_cmd.mongodb_args)
    }
}

/// StoreArgs - Which store backend holds transactions and cached prices
#[derive(Debug, Clone)]
pub enum StoreArgs {
    MongoDB(DatabaseArgs),
    InMemory,
}

impl TryFrom<RunCmd> for StoreArgs {
    type Error = ExplorerError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        match (run_cmd.mongodb_args.mongodb, run_cmd.in_memory_store_args.in_memory_store) {
            (true, false) => Ok(Self::MongoDB(DatabaseArgs::try_from(run_cmd.mongodb_args)?)),
            (false, true) => Ok(Self::InMemory),
            (true, true) => Err(ExplorerError::ConfigError("Only one store backend can be selected".to_string())),
            (false, false) => Err(ExplorerError::ConfigError("A store backend is required".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use assert_matches::assert_matches;
    use clap::Parser;
    use rstest::rstest;

    fn run_cmd(extra: &[&str]) -> RunCmd {
        let args = ["explorer", "run", "--in-memory-relay", "--mongodb"].into_iter().chain(extra.iter().copied());
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Run { run_command } => *run_command,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[rstest]
    #[case(&[], "transactions")]
    #[case(&["--mongodb-transactions-collection", "mainnet_transactions"], "mainnet_transactions")]
    fn transactions_collection_is_configurable(#[case] extra: &[&str], #[case] expected: &str) {
        let store_args = StoreArgs::try_from(run_cmd(extra)).unwrap();
        assert_matches!(store_args, StoreArgs::MongoDB(args) if args.transactions_collection == expected);
    }

    #[test]
    fn empty_transactions_collection_is_a_config_error() {
        let result = StoreArgs::try_from(run_cmd(&["--mongodb-transactions-collection", ""]));
        assert_matches!(result, Err(ExplorerError::ConfigError(_)));
    }

    #[test]
    fn setup_uses_the_configured_collection() {
        let args = ["explorer", "setup", "--aws", "--aws-sqs", "--mongodb", "--mongodb-transactions-collection", "txs"];
        let setup_cmd = match Cli::try_parse_from(args).unwrap().command {
            Commands::Setup { setup_command } => *setup_command,
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(DatabaseArgs::try_from(setup_cmd).unwrap().transactions_collection, "txs");
    }
}
