mod analyzer;
mod models;
mod parser;
mod scraper;

use std::collections::HashSet;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use analyzer::lexicon::Lexicon;
use models::{AnalysisSummary, Post};
use scraper::GalleryClient;

#[derive(Parser)]
#[command(name = "gall_analyzer", about = "DC Inside gallery negativity analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a gallery and print the negativity report
    Analyze {
        /// Gallery URL (list page or short gallery URL)
        url: String,
        /// List pages to crawl (clamped to 1-10)
        #[arg(short = 'n', long, default_value_t = 3)]
        pages: usize,
        /// Minimum keyword hits for a post to count as negative
        #[arg(short = 't', long, default_value_t = analyzer::DEFAULT_THRESHOLD)]
        threshold: usize,
        /// Emit the summary as JSON instead of a report table
        #[arg(long)]
        json: bool,
    },
    /// Crawl only; print the collected posts without scoring
    Scrape {
        url: String,
        #[arg(short = 'n', long, default_value_t = 3)]
        pages: usize,
    },
    /// Show the keyword lexicon grouped by category
    Keywords,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            url,
            pages,
            threshold,
            json,
        } => analyze(&url, pages, threshold, json).await,
        Commands::Scrape { url, pages } => scrape(&url, pages).await,
        Commands::Keywords => {
            print_keywords();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn analyze(url: &str, pages: usize, threshold: usize, json: bool) -> Result<()> {
    let posts = crawl(url, pages).await?;
    if posts.is_empty() {
        println!("No posts found. Check the gallery URL.");
        return Ok(());
    }

    let lexicon = Lexicon::build();
    let summary = analyzer::analyze_posts(&posts, threshold, &lexicon);

    if json {
        println!("{}", serde_json::to_string_pretty(&transport_json(&summary))?);
    } else {
        print_report(&summary);
    }
    Ok(())
}

async fn scrape(url: &str, pages: usize) -> Result<()> {
    let posts = crawl(url, pages).await?;
    if posts.is_empty() {
        println!("No posts found. Check the gallery URL.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<40} | {:<12} | {:<19} | {:>5}",
        "#", "Title", "Writer", "Date", "Chars"
    );
    println!("{}", "-".repeat(92));
    for (i, p) in posts.iter().enumerate() {
        println!(
            "{:>3} | {:<40} | {:<12} | {:<19} | {:>5}",
            i + 1,
            truncate(&p.title, 40),
            truncate(&p.writer, 12),
            truncate(&p.date, 19),
            p.body.chars().count()
        );
    }
    println!("\n{} posts", posts.len());
    Ok(())
}

/// Shared crawl entry: the caller-side checks live here, outside the
/// crawler itself — a non-gallery domain is rejected and the page count
/// is clamped before the core ever sees it.
async fn crawl(url: &str, pages: usize) -> Result<Vec<Post>> {
    if !url.contains("dcinside.com") {
        bail!("not a dcinside.com gallery url: {}", url);
    }
    let pages = pages.clamp(1, 10);

    let client = GalleryClient::new()?;
    let posts = client.scrape_gallery(url, pages).await?;
    Ok(posts)
}

fn print_report(summary: &AnalysisSummary) {
    println!("Posts analyzed:  {}", summary.total);
    println!(
        "Negative posts:  {} ({:.1}%)",
        summary.negative_count, summary.negative_ratio
    );

    if !summary.top_keywords.is_empty() {
        println!("\n--- Top keywords ---");
        for (keyword, count) in &summary.top_keywords {
            println!("  {:<12} {:>4}", keyword, count);
        }
    }

    if !summary.category_summary.is_empty() {
        println!("\n--- Categories ---");
        for (category, count) in &summary.category_summary {
            println!("  {:<12} {:>4}", category, count);
        }
    }

    if !summary.negative_posts.is_empty() {
        println!("\n--- Negative posts ---");
        println!(
            "{:>3} | {:>5} | {:<36} | {:<12} | {}",
            "#", "Score", "Title", "Writer", "Date"
        );
        println!("{}", "-".repeat(90));
        for (i, p) in summary.negative_posts.iter().enumerate() {
            println!(
                "{:>3} | {:>5} | {:<36} | {:<12} | {}",
                i + 1,
                p.negative_score,
                truncate(&p.post.title, 36),
                truncate(&p.post.writer, 12),
                p.post.date
            );
            if !p.body_preview.is_empty() {
                println!("      {}", truncate(&p.body_preview, 80));
            }
        }
    }
}

fn print_keywords() {
    let lexicon = Lexicon::build();
    for (category, count) in lexicon.category_sizes() {
        let words: Vec<&str> = lexicon
            .keywords()
            .iter()
            .filter(|kw| lexicon.category_of(kw) == Some(category.as_str()))
            .map(String::as_str)
            .collect();
        println!("{} ({})", category, count);
        println!("  {}", words.join(", "));
    }
    println!("\n{} keywords total", lexicon.keywords().len());
}

/// Transport form of the summary: the full post bodies and the
/// per-occurrence keyword lists stay local; only previews and the
/// deduplicated keyword set go out.
fn transport_json(summary: &AnalysisSummary) -> serde_json::Value {
    serde_json::json!({
        "total": summary.total,
        "negative_count": summary.negative_count,
        "negative_ratio": summary.negative_ratio,
        "top_keywords": summary
            .top_keywords
            .iter()
            .map(|(keyword, count)| serde_json::json!({ "keyword": keyword, "count": count }))
            .collect::<Vec<_>>(),
        "category_summary": summary.category_summary,
        "negative_posts": summary
            .negative_posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.post.title,
                    "url": p.post.url,
                    "writer": p.post.writer,
                    "date": p.post.date,
                    "negative_score": p.negative_score,
                    "matched_keywords_summary": dedup_keywords(&p.matched_keywords),
                    "body_preview": p.body_preview,
                })
            })
            .collect::<Vec<_>>(),
    })
}

fn dedup_keywords(matched: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    matched
        .iter()
        .filter(|kw| seen.insert(kw.as_str()))
        .cloned()
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
