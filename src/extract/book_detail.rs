use scraper::Html;
use std::collections::BTreeMap;

use super::{element_text, normalize_number, parse_update_text, select_first, selector};
use crate::model::{
    BookDetail, Metric, STAT_TOTAL_CLICKS, STAT_TOTAL_FAVORITES, STAT_TOTAL_WORDS,
    UNKNOWN_TIMESTAMP,
};
use crate::site::Site;

/// Parses a book page into a best-effort [`BookDetail`]
///
/// Each field is extracted on its own. A field whose markup is missing gets
/// its sentinel value and the remaining fields are still extracted, so a
/// partially broken page still yields a useful record.
///
/// | Field | Source |
/// |-------|--------|
/// | title | last `>` segment of `div.breadcrumb` |
/// | author | `h1.title a` |
/// | tags | `p.label-box span` |
/// | latest chapter / update | `p.update-time` |
/// | intro | `div.book-desc`, spaces removed |
/// | cover | `div.cover.ly-fl img`, else the last `img` on the page |
/// | properties | `label：value` spans in `div.book-property.clearfix` |
/// | stats | first three `b` of `p.book-grade` |
pub fn parse_book_details(html: &str, site: &Site) -> BookDetail {
    let document = Html::parse_document(html);

    let (latest_chapter_title, latest_update_ts) =
        extract_update(&document).unwrap_or((String::new(), UNKNOWN_TIMESTAMP));

    let detail = BookDetail {
        title: extract_title(&document).unwrap_or_default(),
        author: extract_author(&document).unwrap_or_default(),
        tags: extract_tags(&document).unwrap_or_default(),
        latest_chapter_title,
        latest_update_ts,
        intro: extract_intro(&document).unwrap_or_default(),
        cover_url: extract_cover(&document, site).unwrap_or_default(),
        stats: extract_stats(&document).unwrap_or_default(),
        properties: extract_properties(&document).unwrap_or_default(),
    };

    if detail.title.is_empty() {
        tracing::warn!("Book page has no breadcrumb title");
    }
    tracing::debug!(
        "Parsed book {:?}: {} tags, {} stats, {} properties",
        detail.title,
        detail.tags.len(),
        detail.stats.len(),
        detail.properties.len()
    );

    detail
}

fn extract_title(document: &Html) -> Option<String> {
    let breadcrumb = element_text(select_first(document, "div.breadcrumb")?);
    breadcrumb.rsplit('>').next().map(|s| s.trim().to_string())
}

fn extract_author(document: &Html) -> Option<String> {
    select_first(document, "h1.title a").map(element_text)
}

fn extract_tags(document: &Html) -> Option<Vec<String>> {
    let span_selector = selector("p.label-box span")?;
    Some(
        document
            .select(&span_selector)
            .map(element_text)
            .filter(|tag| !tag.is_empty())
            .collect(),
    )
}

fn extract_update(document: &Html) -> Option<(String, i64)> {
    let update = select_first(document, "p.update-time")?;
    Some(parse_update_text(&element_text(update)))
}

fn extract_intro(document: &Html) -> Option<String> {
    let desc = select_first(document, "div.book-desc")?;
    Some(desc.text().collect::<String>().replace(' ', "").trim().to_string())
}

fn extract_cover(document: &Html, site: &Site) -> Option<String> {
    let src = select_first(document, "div.cover.ly-fl img")
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .or_else(|| {
            let img_selector = selector("img")?;
            document
                .select(&img_selector)
                .last()
                .and_then(|img| img.value().attr("src"))
        })?;
    site.resolve(src)
}

fn extract_properties(document: &Html) -> Option<BTreeMap<String, Metric>> {
    let property_box = select_first(document, "div.book-property.clearfix")?;
    let span_selector = selector("span")?;

    let mut properties = BTreeMap::new();
    for span in property_box.select(&span_selector) {
        let text = element_text(span).replace('：', ":");
        let Some((key, value)) = text.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        properties.insert(key.to_string(), normalize_number(value.trim()));
    }
    Some(properties)
}

fn extract_stats(document: &Html) -> Option<BTreeMap<String, Metric>> {
    let grade = select_first(document, "p.book-grade")?;
    let bold_selector = selector("b")?;

    let values: Vec<String> = grade
        .select(&bold_selector)
        .map(element_text)
        .filter(|value| !value.is_empty())
        .collect();
    if values.len() < 3 {
        tracing::debug!("book-grade has {} values, expected 3", values.len());
        return None;
    }

    Some(
        [STAT_TOTAL_CLICKS, STAT_TOTAL_FAVORITES, STAT_TOTAL_WORDS]
            .iter()
            .zip(&values)
            .map(|(key, value)| (key.to_string(), normalize_number(value)))
            .collect(),
    )
}
