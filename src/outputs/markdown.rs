//! Markdown rendering for reading results in a terminal or a notes app.

use crate::models::{ExtractedDocument, LatestItems, Source, TrendingTopics};

fn article_line(title: &str, url: &str, source: Option<&str>, score: f64) -> String {
    match source {
        Some(source) => format!("- [{title}]({url}) - {source} (score {score})\n"),
        None => format!("- [{title}]({url}) (score {score})\n"),
    }
}

pub fn trending_to_markdown(trending: &TrendingTopics) -> String {
    let mut md = format!(
        "# Trending topics (last {} hours)\n\n{} topics\n",
        trending.hours, trending.count
    );
    for (rank, topic) in trending.topics.iter().enumerate() {
        md.push_str(&format!(
            "\n## {}. {} ({} mentions)\n\n",
            rank + 1,
            topic.topic,
            topic.mention_count
        ));
        for article in &topic.top_articles {
            md.push_str(&article_line(
                &article.title,
                &article.url,
                article.source.as_deref(),
                article.score,
            ));
        }
    }
    md
}

pub fn latest_to_markdown(latest: &LatestItems) -> String {
    let mut md = format!(
        "# Top items (last {} hours)\n\n{} items\n\n",
        latest.hours, latest.count
    );
    for item in &latest.items {
        md.push_str(&article_line(&item.title, &item.url, item.source_name(), item.score));
    }
    md
}

pub fn sources_to_markdown(sources: &[Source]) -> String {
    let mut md = format!("# Sources\n\n{} sources\n\n", sources.len());
    for source in sources {
        let name = ["name", "title", "id"]
            .iter()
            .find_map(|key| source.extra.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("(unnamed)");
        match &source.region {
            Some(region) => md.push_str(&format!("- {name} [{region}]\n")),
            None => md.push_str(&format!("- {name}\n")),
        }
    }
    md
}

pub fn document_to_markdown(doc: &ExtractedDocument) -> String {
    let title = if doc.title.is_empty() { "(untitled)" } else { doc.title.as_str() };
    let mut md = format!("# {title}\n\n");
    if !doc.source.is_empty() {
        md.push_str(&format!("- **Source:** {}\n", doc.source));
    }
    if let Some(published) = &doc.published_at {
        md.push_str(&format!("- **Published:** {published}\n"));
    }
    md.push_str(&format!("- **Words:** {}\n\n{}\n", doc.word_count, doc.content));
    md
}
