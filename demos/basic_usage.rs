//! Basic usage example for the Antibody Leads library.
//!
//! Crawls a few PubMed result pages for a target protein and prints each
//! lead as it arrives.

use antibody_leads::config::get_config;
use antibody_leads::crawl::Crawler;
use antibody_leads::models::{CrawlRequest, SearchQuery};
use futures_util::{pin_mut, StreamExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config()?;
    let crawler = Crawler::from_config(&config)?;

    let request = CrawlRequest::new("CD47")
        .max_results(10)
        .max_publications(300);

    println!("Query: {}\n", SearchQuery::for_target(&request.target_term));

    let events = crawler.progress_stream(request);
    pin_mut!(events);

    while let Some(event) = events.next().await {
        if let Some(article) = &event.article {
            println!("[{:>3.0}%] {}", event.percent, article.title);
            println!("   Authors: {}", article.authors);
            println!(
                "   First author publications: {}",
                article.first_author_publications
            );
            println!("   Email: {}", article.email);
            println!("   Summary: {}", article.summary);
            println!("   Link: {}\n", article.source_link);
        } else if let Some(error) = &event.error {
            eprintln!("{}", error);
        } else if let Some(message) = &event.message {
            println!("{}", message);
        }
    }

    Ok(())
}
