use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use datarepo::cli::{load_objects, Backend, Cli, Commands};
use datarepo::storage::InMemoryDataRepo;
use datarepo_core::index::IndexDescription;
use datarepo_core::keys::KeyConfig;
use datarepo_core::storage::{DataRepo, GetResponse, ListResponse, WriteResponse};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datarepo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let repo = build_repo(cli.backend, cli.keys).await?;

    let objects = match &cli.data {
        Some(path) => load_objects(path)?,
        None => Vec::new(),
    };
    tracing::info!(count = objects.len(), "Loaded objects");

    let ok = match cli.command {
        Commands::Put => {
            let mut responses = Vec::with_capacity(objects.len());
            let mut ok = true;
            for object in objects {
                match repo.put_object(object.clone()).await {
                    Ok(response) => responses.push(response),
                    Err(e) => {
                        tracing::error!(error = %e, "Write failed");
                        responses.push(WriteResponse::from_error(object, &e));
                        ok = false;
                        break;
                    }
                }
            }
            print_json(&responses)?;
            ok
        }
        Commands::Get { template } => {
            repo.put_objects(objects).await?;
            match repo.get_object(&template).await {
                Ok(response) => print_json(&response)?,
                Err(e) => {
                    print_json(&GetResponse::from_error(&e))?;
                    return Ok(ExitCode::FAILURE);
                }
            }
            true
        }
        Commands::List { template } => {
            repo.put_objects(objects).await?;
            match repo.list_objects(&template).await {
                Ok(response) => print_json(&response)?,
                Err(e) => {
                    print_json(&ListResponse::from_error(&e))?;
                    return Ok(ExitCode::FAILURE);
                }
            }
            true
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn build_repo(backend: Backend, keys: Vec<KeyConfig>) -> Result<Box<dyn DataRepo>> {
    let index = IndexDescription::new(keys).with_name("primary");

    match backend {
        Backend::Memory => {
            let mut repo = InMemoryDataRepo::new();
            repo.provide_index(index);
            Ok(Box::new(repo))
        }
        #[cfg(feature = "dynamodb")]
        Backend::Dynamodb => {
            let mut repo = datarepo::storage::DynamoDbDataRepo::from_env().await?;
            tracing::info!(table = %repo.options().table_name, "Using DynamoDB backend");
            repo.provide_index(index);
            Ok(Box::new(repo))
        }
        #[cfg(not(feature = "dynamodb"))]
        Backend::Dynamodb => {
            anyhow::bail!("datarepo was built without the `dynamodb` feature")
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
