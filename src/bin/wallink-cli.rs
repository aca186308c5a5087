use clap::{Parser, Subcommand};
use serde::Serialize;
use wallink_sdk::{LinkInput, RelayClient, SdkError};

#[derive(Parser)]
#[command(name = "wallink-cli")]
#[command(about = "Command-line client for the wallink relay", long_about = None)]
struct Cli {
    /// Relay URL including any base path
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show node reachability and sponsor balance
    Health,
    /// Build a profile creation transaction
    CreateProfile {
        #[arg(long)]
        address: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Link as TITLE=URL, repeatable
        #[arg(long = "link", value_parser = parse_link)]
        links: Vec<LinkInput>,
    },
    /// Build a transaction appending one link
    AddLink {
        #[arg(long)]
        address: String,
        #[arg(long)]
        nft: String,
        #[arg(long)]
        title: String,
        #[arg(long = "link-url")]
        link_url: String,
    },
    /// Build a transaction replacing the link at an index
    UpdateLink {
        #[arg(long)]
        address: String,
        #[arg(long)]
        nft: String,
        #[arg(long)]
        index: u64,
        #[arg(long)]
        title: String,
        #[arg(long = "link-url")]
        link_url: String,
    },
    /// Build a transaction removing the link at an index
    RemoveLink {
        #[arg(long)]
        address: String,
        #[arg(long)]
        nft: String,
        #[arg(long)]
        index: u64,
    },
    /// Build a transaction overwriting name, surname and description
    UpdateProfile {
        #[arg(long)]
        address: String,
        #[arg(long)]
        nft: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Submit signed transaction bytes
    Execute {
        #[arg(long)]
        bytes: String,
        #[arg(long)]
        signature: String,
    },
}

fn parse_link(raw: &str) -> Result<LinkInput, String> {
    let (title, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TITLE=URL, got '{raw}'"))?;
    Ok(LinkInput {
        title: title.to_string(),
        url: url.to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RelayClient::new(&cli.url);

    match cli.command {
        Commands::Health => print_result(client.health().await)?,
        Commands::CreateProfile {
            address,
            name,
            surname,
            description,
            links,
        } => print_result(
            client
                .create_profile(&address, &name, &surname, &description, &links)
                .await,
        )?,
        Commands::AddLink {
            address,
            nft,
            title,
            link_url,
        } => print_result(client.add_link(&address, &nft, &title, &link_url).await)?,
        Commands::UpdateLink {
            address,
            nft,
            index,
            title,
            link_url,
        } => print_result(
            client
                .update_link(&address, &nft, index, &title, &link_url)
                .await,
        )?,
        Commands::RemoveLink {
            address,
            nft,
            index,
        } => print_result(client.remove_link(&address, &nft, index).await)?,
        Commands::UpdateProfile {
            address,
            nft,
            name,
            surname,
            description,
        } => print_result(
            client
                .update_profile(&address, &nft, &name, &surname, &description)
                .await,
        )?,
        Commands::Execute { bytes, signature } => {
            print_result(client.execute(&bytes, &signature).await)?
        }
    }

    Ok(())
}

fn print_result<T: Serialize>(result: Result<T, SdkError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(SdkError::Api { status, message }) => {
            eprintln!("Error: relay returned status {}", status);
            eprintln!("Response: {}", message);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
