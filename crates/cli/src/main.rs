//! Phresh CLI - Command-line client for the Phresh marketplace daemon

mod output;
mod rpc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::json;

use output::{Aggregate, Evaluation, Offer, Stats};
use rpc::RpcClient;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "phresh")]
#[command(about = "Phresh marketplace CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, global = true, env = "PHRESH_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// User id to act as
    #[arg(long = "as", global = true, env = "PHRESH_ACTOR_ID")]
    actor: Option<i64>,

    /// Print raw JSON results
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a job owned by the acting user
    RegisterJob {
        /// Job name
        name: String,
    },

    /// Offer lifecycle
    #[command(subcommand)]
    Offer(OfferCommand),

    /// Evaluate the accepted cleaner of a job (completes the offer)
    Evaluate {
        job_id: i64,
        cleaner_id: i64,

        /// Overall rating (0-5)
        #[arg(short, long)]
        overall: i32,

        #[arg(long)]
        professionalism: Option<i32>,

        #[arg(long)]
        completeness: Option<i32>,

        #[arg(long)]
        efficiency: Option<i32>,

        #[arg(long)]
        headline: Option<String>,

        #[arg(long)]
        comment: Option<String>,

        /// The cleaner did not show up
        #[arg(long)]
        no_show: bool,
    },

    /// Read evaluations
    #[command(subcommand)]
    Evaluation(EvaluationCommand),

    /// Show daemon status
    Status,
}

#[derive(Subcommand)]
enum OfferCommand {
    /// Offer to clean a job
    Create { job_id: i64 },

    /// List all offers of a job you own
    List {
        job_id: i64,

        /// Embed the job summary
        #[arg(long)]
        populate: bool,
    },

    /// Show one offer
    Get {
        job_id: i64,
        candidate_id: i64,

        #[arg(long)]
        populate: bool,
    },

    /// Accept a pending offer on your job
    Accept { job_id: i64, candidate_id: i64 },

    /// Cancel your accepted offer
    Cancel { job_id: i64 },

    /// Withdraw your pending offer
    Rescind { job_id: i64 },
}

#[derive(Subcommand)]
enum EvaluationCommand {
    /// Show the evaluation of a cleaner for a job
    Get { job_id: i64, cleaner_id: i64 },

    /// List evaluations of a cleaner
    List { cleaner_id: i64 },

    /// Rating statistics of a cleaner
    Stats { cleaner_id: i64 },
}

impl Cli {
    fn actor(&self) -> Result<i64> {
        self.actor
            .context("No acting user: pass --as <user_id> or set PHRESH_ACTOR_ID")
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(&cli.rpc_url);

    match &cli.command {
        Commands::RegisterJob { name } => {
            let params = json!({ "owner_id": cli.actor()?, "name": name });
            let job = client.call_raw("jobs.register.v1", params).await?;

            if cli.json {
                return print_json(&job);
            }
            println!(
                "{}",
                format!("✓ Job {} registered", job["id"]).green().bold()
            );
        }

        Commands::Offer(command) => run_offer(&cli, &client, command).await?,

        Commands::Evaluate {
            job_id,
            cleaner_id,
            overall,
            professionalism,
            completeness,
            efficiency,
            headline,
            comment,
            no_show,
        } => {
            let params = json!({
                "actor_id": cli.actor()?,
                "job_id": job_id,
                "cleaner_id": cleaner_id,
                "evaluation": {
                    "no_show": no_show,
                    "headline": headline,
                    "comment": comment,
                    "professionalism": professionalism,
                    "completeness": completeness,
                    "efficiency": efficiency,
                    "overall_rating": overall,
                },
            });
            let evaluation = client.call_raw("evaluations.create.v1", params).await?;

            if cli.json {
                return print_json(&evaluation);
            }
            println!(
                "{}",
                format!("✓ Cleaner {} evaluated; offer completed", cleaner_id)
                    .green()
                    .bold()
            );
            let evaluation: Evaluation = serde_json::from_value(evaluation)?;
            println!("{}", output::evaluations_table(vec![evaluation]));
        }

        Commands::Evaluation(command) => run_evaluation(&cli, &client, command).await?,

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match client.call::<Stats>("admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), client.url());
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Total Offers:".bold(), stats.total_offers);
                    for (status, count) in &stats.offers {
                        println!("    {:<10} {}", output::status(status), count);
                    }
                    println!("  {} {}", "Evaluations:".bold(), stats.total_evaluations);
                    println!("  {} {} seconds", "Uptime:".bold(), stats.uptime_seconds);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}

async fn run_offer(cli: &Cli, client: &RpcClient, command: &OfferCommand) -> Result<()> {
    let actor = cli.actor()?;

    let (method, params, message) = match command {
        OfferCommand::Create { job_id } => (
            "offers.create.v1",
            json!({ "actor_id": actor, "job_id": job_id }),
            format!("✓ Offer submitted for job {}", job_id),
        ),
        OfferCommand::List { job_id, populate } => {
            let params = json!({ "actor_id": actor, "job_id": job_id, "populate": populate });
            let offers = client.call_raw("offers.list.v1", params).await?;
            if cli.json {
                return print_json(&offers);
            }
            let offers: Vec<Offer> = serde_json::from_value(offers)?;
            if offers.is_empty() {
                println!("{}", format!("No offers for job {}", job_id).yellow());
            } else {
                println!("{}", output::offers_table(offers));
            }
            return Ok(());
        }
        OfferCommand::Get {
            job_id,
            candidate_id,
            populate,
        } => (
            "offers.get.v1",
            json!({
                "actor_id": actor,
                "job_id": job_id,
                "candidate_id": candidate_id,
                "populate": populate,
            }),
            String::new(),
        ),
        OfferCommand::Accept {
            job_id,
            candidate_id,
        } => (
            "offers.accept.v1",
            json!({ "actor_id": actor, "job_id": job_id, "candidate_id": candidate_id }),
            format!("✓ Offer from {} accepted; other pending offers rejected", candidate_id),
        ),
        OfferCommand::Cancel { job_id } => (
            "offers.cancel.v1",
            json!({ "actor_id": actor, "job_id": job_id }),
            format!("✓ Offer for job {} cancelled; rejected offers reopened", job_id),
        ),
        OfferCommand::Rescind { job_id } => {
            let params = json!({ "actor_id": actor, "job_id": job_id });
            let result = client.call_raw("offers.rescind.v1", params).await?;
            if cli.json {
                return print_json(&result);
            }
            println!(
                "{}",
                format!("✓ Offer for job {} rescinded", job_id).green().bold()
            );
            return Ok(());
        }
    };

    let offer = client.call_raw(method, params).await?;
    if cli.json {
        return print_json(&offer);
    }
    if !message.is_empty() {
        println!("{}", message.green().bold());
    }
    let offer: Offer = serde_json::from_value(offer)?;
    println!("{}", output::offers_table(vec![offer]));
    Ok(())
}

async fn run_evaluation(cli: &Cli, client: &RpcClient, command: &EvaluationCommand) -> Result<()> {
    match command {
        EvaluationCommand::Get { job_id, cleaner_id } => {
            let params = json!({ "job_id": job_id, "cleaner_id": cleaner_id });
            let evaluation = client.call_raw("evaluations.get.v1", params).await?;
            if cli.json {
                return print_json(&evaluation);
            }
            let comment = evaluation["comment"].as_str().map(str::to_string);
            let evaluation: Evaluation = serde_json::from_value(evaluation)?;
            println!("{}", output::evaluations_table(vec![evaluation]));
            if let Some(comment) = comment {
                println!();
                println!("{}", comment);
            }
        }
        EvaluationCommand::List { cleaner_id } => {
            let params = json!({ "cleaner_id": cleaner_id });
            let evaluations = client.call_raw("evaluations.list.v1", params).await?;
            if cli.json {
                return print_json(&evaluations);
            }
            let evaluations: Vec<Evaluation> = serde_json::from_value(evaluations)?;
            if evaluations.is_empty() {
                println!("{}", format!("No evaluations for cleaner {}", cleaner_id).yellow());
            } else {
                println!("{}", output::evaluations_table(evaluations));
            }
        }
        EvaluationCommand::Stats { cleaner_id } => {
            let params = json!({ "cleaner_id": cleaner_id });
            let stats = client.call_raw("evaluations.stats.v1", params).await?;
            if cli.json {
                return print_json(&stats);
            }
            let stats: Aggregate = serde_json::from_value(stats)?;
            output::print_aggregate(*cleaner_id, &stats);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_actor_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["phresh", "offer", "accept", "7", "3", "--as", "1"]).unwrap();
        assert_eq!(cli.actor, Some(1));
        assert!(matches!(
            cli.command,
            Commands::Offer(OfferCommand::Accept {
                job_id: 7,
                candidate_id: 3
            })
        ));
    }

    #[test]
    fn test_evaluate_requires_overall_rating() {
        let result = Cli::try_parse_from(["phresh", "--as", "1", "evaluate", "7", "3"]);
        assert!(result.is_err());
    }
}
