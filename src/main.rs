//! CLI entry point: resolve a handle and print the canonical record.

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use igscout::{CandidateEmails, LookupError, Profile, ProfileLookup, Settings};

#[derive(Parser)]
#[command(name = "igscout", version, about = "Resilient profile retrieval")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a profile by handle.
    Lookup {
        /// Handle to resolve, without the leading @.
        username: String,
        /// Proxy endpoint to rotate through; repeat for more than one.
        #[arg(long = "proxy", env = "IGSCOUT_PROXY")]
        proxies: Vec<String>,
        /// Request timeout in seconds.
        #[arg(long, env = "IGSCOUT_TIMEOUT", default_value_t = 15)]
        timeout: u64,
        /// Emit the record as JSON instead of the readable table.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Lookup {
            username,
            proxies,
            timeout,
            json,
        } => {
            let settings = Settings {
                request_timeout: timeout,
                proxies,
                ..Default::default()
            };
            let mut lookup = ProfileLookup::new(settings)?;

            match lookup.retrieve_report(&username).await {
                Ok(report) => {
                    if json {
                        let mut value = serde_json::to_value(&report.profile)?;
                        value["emails"] = serde_json::to_value(&report.emails)?;
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    } else {
                        print_profile(&report.profile);
                        print_emails(&report.emails);
                    }
                }
                Err(error) => {
                    print_failure(&error);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn field(label: &str, value: Option<String>) {
    println!(
        "{:<16} {}",
        style(label).bold(),
        value.unwrap_or_else(|| "-".to_string())
    );
}

fn print_profile(profile: &Profile) {
    println!("\n{}", style("Profile").bold().underlined());
    field("Username", profile.username.clone());
    field("ID", profile.id.clone());
    field("Name", profile.full_name.clone());
    field("Bio", profile.biography.clone());
    field("URL", profile.external_url.clone());
    field("Posts", profile.total_posts.map(|count| count.to_string()));
    field(
        "Followers",
        profile.total_followers.map(|count| count.to_string()),
    );
    field(
        "Following",
        profile.total_following.map(|count| count.to_string()),
    );
    field("Private", profile.is_private.map(|flag| flag.to_string()));
    field("Verified", profile.is_verified.map(|flag| flag.to_string()));
    field("Business", profile.is_business.map(|flag| flag.to_string()));
    field("Avatar", profile.profile_pic_url.clone());

    if let Some(email) = &profile.business_email {
        println!("{:<16} {}", style("Business Email").bold(), style(email).green());
    }
    if let Some(email) = &profile.public_email {
        println!("{:<16} {}", style("Public Email").bold(), style(email).green());
    }
    if let Some(phone) = &profile.contact_phone {
        field("Contact Phone", Some(phone.clone()));
    }
    if let Some(address) = &profile.business_address {
        field("Address", Some(address.to_string()));
    }
}

fn print_emails(emails: &CandidateEmails) {
    if !emails.found.is_empty() {
        let found: Vec<&str> = emails.found.iter().map(String::as_str).collect();
        println!(
            "{:<16} {}",
            style("Emails found").bold(),
            style(found.join(", ")).green()
        );
    }

    if !emails.potential.is_empty() {
        let sample: Vec<&str> = emails
            .potential
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        println!(
            "{:<16} {}",
            style("Potential").bold(),
            style(sample.join(", ")).yellow()
        );
        if emails.potential.len() > 5 {
            println!(
                "{:<16} ...and {} more candidate addresses",
                "",
                emails.potential.len() - 5
            );
        }
    }
}

fn print_failure(error: &LookupError) {
    eprintln!("{} {}", style("✗").red(), error);
    for (index, failure) in error.failures().iter().enumerate() {
        eprintln!("  {}. {}", index + 1, style(failure).yellow());
    }
    if !error.failures().is_empty() {
        eprintln!(
            "\n{} the remote may be rate limiting; wait a few minutes, verify the handle, or supply proxies with --proxy",
            style("hint:").cyan()
        );
    }
}
