//! Table rendering for RPC results

use chrono::{TimeZone, Utc};
use colored::{ColoredString, Colorize};
use serde::Deserialize;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

#[derive(Debug, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Offer {
    pub job_id: i64,
    pub candidate_id: i64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub job: Option<JobSummary>,
}

#[derive(Debug, Deserialize)]
pub struct Evaluation {
    pub job_id: i64,
    pub cleaner_id: i64,
    pub no_show: bool,
    pub headline: Option<String>,
    pub overall_rating: i32,
    pub professionalism: Option<i32>,
    pub completeness: Option<i32>,
    pub efficiency: Option<i32>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct Aggregate {
    pub avg_professionalism: f64,
    pub avg_completeness: f64,
    pub avg_efficiency: f64,
    pub avg_overall_rating: f64,
    pub max_overall_rating: i32,
    pub min_overall_rating: i32,
    pub one_stars: i64,
    pub two_stars: i64,
    pub three_stars: i64,
    pub four_stars: i64,
    pub five_stars: i64,
    pub total_evaluations: i64,
    pub total_no_show: i64,
}

#[derive(Debug, Deserialize)]
pub struct Stats {
    pub offers: BTreeMap<String, i64>,
    pub total_offers: i64,
    pub total_evaluations: i64,
    pub uptime_seconds: i64,
}

#[derive(Tabled)]
struct OfferRow {
    job: String,
    candidate: i64,
    status: String,
    created: String,
    updated: String,
}

#[derive(Tabled)]
struct EvaluationRow {
    job: i64,
    cleaner: i64,
    overall: String,
    professionalism: String,
    completeness: String,
    efficiency: String,
    no_show: bool,
    headline: String,
    created: String,
}

pub fn status(status: &str) -> ColoredString {
    match status {
        "pending" => status.yellow(),
        "accepted" => status.green().bold(),
        "rejected" => status.red(),
        "cancelled" => status.dimmed(),
        "completed" => status.blue(),
        other => other.normal(),
    }
}

pub fn timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn optional(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn offers_table(offers: Vec<Offer>) -> String {
    let rows: Vec<OfferRow> = offers
        .into_iter()
        .map(|offer| OfferRow {
            job: match offer.job {
                Some(job) => format!("{} ({}, owner {})", job.id, job.name, job.owner_id),
                None => offer.job_id.to_string(),
            },
            candidate: offer.candidate_id,
            status: status(&offer.status).to_string(),
            created: timestamp(offer.created_at),
            updated: timestamp(offer.updated_at),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn evaluations_table(evaluations: Vec<Evaluation>) -> String {
    let rows: Vec<EvaluationRow> = evaluations
        .into_iter()
        .map(|e| EvaluationRow {
            job: e.job_id,
            cleaner: e.cleaner_id,
            overall: format!("{}/5", e.overall_rating),
            professionalism: optional(e.professionalism),
            completeness: optional(e.completeness),
            efficiency: optional(e.efficiency),
            no_show: e.no_show,
            headline: e.headline.unwrap_or_default(),
            created: timestamp(e.created_at),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn print_aggregate(cleaner_id: i64, stats: &Aggregate) {
    println!("{}", format!("Cleaner {}", cleaner_id).cyan().bold());
    println!();
    println!("  {} {}", "Evaluations:".bold(), stats.total_evaluations);
    println!(
        "  {} {:.2} (min {}, max {})",
        "Overall:".bold(),
        stats.avg_overall_rating,
        stats.min_overall_rating,
        stats.max_overall_rating
    );
    println!("  {} {:.2}", "Professionalism:".bold(), stats.avg_professionalism);
    println!("  {} {:.2}", "Completeness:".bold(), stats.avg_completeness);
    println!("  {} {:.2}", "Efficiency:".bold(), stats.avg_efficiency);
    println!(
        "  {} 1★ {} | 2★ {} | 3★ {} | 4★ {} | 5★ {}",
        "Stars:".bold(),
        stats.one_stars,
        stats.two_stars,
        stats.three_stars,
        stats.four_stars,
        stats.five_stars
    );
    println!("  {} {}", "No-shows:".bold(), stats.total_no_show);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_offers_table_shows_populated_job() {
        colored::control::set_override(false);
        let table = offers_table(vec![Offer {
            job_id: 4,
            candidate_id: 9,
            status: "pending".to_string(),
            created_at: 0,
            updated_at: 0,
            job: Some(JobSummary {
                id: 4,
                owner_id: 1,
                name: "Attic".to_string(),
            }),
        }]);
        assert!(table.contains("4 (Attic, owner 1)"));
        assert!(table.contains("pending"));
    }
}
