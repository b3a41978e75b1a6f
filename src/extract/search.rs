use scraper::{ElementRef, Html};

use super::{element_text, select_within, selector};
use crate::model::{
    SearchResultItem, UNKNOWN_AUTHOR, UNKNOWN_LINK, UNKNOWN_TITLE, UNKNOWN_UPDATE,
};
use crate::site::Site;

const AUTHOR_LABEL: &str = "小说作者";
const UPDATE_LABEL: &str = "最近更新";

/// Parses a search-results page into one item per `li[data-book-id]`
///
/// Fields are extracted independently with visible placeholders on a miss,
/// and `read_url` is always absolute or the unknown-link placeholder.
pub fn parse_search_results(html: &str, site: &Site) -> Vec<SearchResultItem> {
    let document = Html::parse_document(html);
    let Some(item_selector) = selector("li[data-book-id]") else {
        return Vec::new();
    };

    let results: Vec<SearchResultItem> = document
        .select(&item_selector)
        .map(|item| parse_item(item, site))
        .collect();

    tracing::debug!("Parsed {} search results", results.len());
    results
}

fn parse_item(item: ElementRef<'_>, site: &Site) -> SearchResultItem {
    let title_anchor = select_within(item, "p.tit a");

    let title = title_anchor
        .map(element_text)
        .filter(|title| !title.is_empty())
        .or_else(|| select_within(item, "p.tit").map(element_text))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let href = title_anchor
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .or_else(|| select_within(item, "a.cover").and_then(|a| a.value().attr("href")))
        .unwrap_or_default();

    let mut author = UNKNOWN_AUTHOR.to_string();
    let mut update_time = UNKNOWN_UPDATE.to_string();
    if let Some(p_selector) = selector("p") {
        for paragraph in item.select(&p_selector) {
            let text = element_text(paragraph);
            if text.contains(AUTHOR_LABEL) {
                if let Some(name) = select_within(paragraph, "a").map(element_text) {
                    if !name.is_empty() {
                        author = name;
                    }
                }
            } else if text.contains(UPDATE_LABEL) {
                update_time = text;
            }
        }
    }

    let description = select_within(item, "div.desc")
        .map(element_text)
        .unwrap_or_default();

    SearchResultItem {
        title,
        author,
        update_time,
        description,
        read_url: site
            .resolve(href)
            .unwrap_or_else(|| UNKNOWN_LINK.to_string()),
    }
}

/// Collects `(title, book id)` pairs from the title links of a search page
///
/// Order follows the page. A title seen twice keeps its first position and
/// takes the later id.
pub fn parse_search_ids(html: &str, site: &Site) -> Vec<(String, u64)> {
    let document = Html::parse_document(html);
    let Some(anchor_selector) = selector("p.tit a[href]") else {
        return Vec::new();
    };

    let mut matches: Vec<(String, u64)> = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let Some(id) = anchor
            .value()
            .attr("href")
            .and_then(|href| site.book_id_from_href(href))
        else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        match matches.iter_mut().find(|entry| entry.0 == title) {
            Some(entry) => entry.1 = id,
            None => matches.push((title, id)),
        }
    }
    matches
}
