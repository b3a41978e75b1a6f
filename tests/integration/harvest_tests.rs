//! End-to-end harvester operations against a mock site

use crate::{chapter_index_page, chapter_page, create_test_config};
use cwm_harvest::crawler::harvest_recent;
use cwm_harvest::model::{STAT_TOTAL_CLICKS, UNKNOWN_TIMESTAMP};
use cwm_harvest::{Harvester, Metric, SearchLookup};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const SEARCH_PATH: &str = r"^/get-search-book-list/0-0-0-0-0-0/[^/]+/[^/]+/1$";

/// Serves chapter pages by id, breaking a chosen few
struct ChapterPages {
    missing: Vec<u64>,
    malformed: Vec<u64>,
    zero_words: Vec<u64>,
}

impl Respond for ChapterPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id: u64 = match request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
        {
            Some(id) => id,
            None => return ResponseTemplate::new(400),
        };

        if self.missing.contains(&id) {
            ResponseTemplate::new(404)
        } else if self.malformed.contains(&id) {
            ResponseTemplate::new(200).set_body_string("<html><body>维护中</body></html>")
        } else if self.zero_words.contains(&id) {
            ResponseTemplate::new(200).set_body_string(chapter_page("3", "2024-01-01 00:00:00", "0"))
        } else {
            ResponseTemplate::new(200).set_body_string(chapter_page(
                &(id % 7).to_string(),
                "2024-01-01 00:00:00",
                &(1000 + id).to_string(),
            ))
        }
    }
}

#[tokio::test]
async fn test_recent_chapters_drop_failures_and_keep_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // 60 chapters listed newest first
    Mock::given(method("GET"))
        .and(path("/chapter-list/42/book_detail"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(chapter_index_page(&base_url, (1..=60).rev())),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/chapter/\d+$"))
        .respond_with(ChapterPages {
            missing: vec![20],
            malformed: vec![30],
            zero_words: vec![40],
        })
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&base_url)).unwrap();
    let chapters = harvester.get_recent_chapters(42, 50).await;

    assert_eq!(chapters.len(), 47);

    // One chapter task per listed chapter; retries hit the same path
    let requests = mock_server.received_requests().await.unwrap();
    let mut detail_paths: Vec<String> = requests
        .iter()
        .map(|request| request.url.path().to_string())
        .filter(|path| path.starts_with("/chapter/"))
        .collect();
    detail_paths.sort();
    detail_paths.dedup();
    assert_eq!(detail_paths.len(), 50);

    let ids: Vec<u64> = chapters.iter().map(|c| c.id).collect();
    let expected: Vec<u64> = (11..=60).filter(|id| ![20, 30, 40].contains(id)).collect();
    assert_eq!(ids, expected);

    let first = &chapters[0];
    assert_eq!(first.title, "第11章");
    assert_eq!(first.comment_count, 11 % 7);
    assert_eq!(first.word_count, 1011);
    assert_eq!(first.updated_at, "2024-01-01 00:00:00");
    assert_eq!(first.as_row(), (11, "第11章".to_string(), 4, "2024-01-01 00:00:00".to_string(), 1011));
}

#[tokio::test]
async fn test_empty_index_makes_no_detail_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter-list/7/book_detail"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>该书不存在</body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/chapter/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    assert!(harvester.get_recent_chapters(7, 50).await.is_empty());
}

#[tokio::test]
async fn test_unavailable_index_yields_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter-list/8/book_detail"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let chapters = harvest_recent(create_test_config(&mock_server.uri()), 8, 50)
        .await
        .unwrap();
    assert!(chapters.is_empty());
}

#[tokio::test]
async fn test_search_book_by_name() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let page = format!(
        r#"<html><body><ul>
        <li data-book-id="100"><p class="tit"><a href="{base_url}/book/100">某书</a></p></li>
        <li data-book-id="101"><p class="tit"><a href="{base_url}/book/101">某书外传</a></p></li>
        </ul></body></html>"#
    );

    Mock::given(method("GET"))
        .and(path_regex(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&base_url)).unwrap();
    let lookup = harvester.search_book_by_name("某书").await.unwrap();

    assert_eq!(
        lookup,
        SearchLookup::Matches(vec![("某书".to_string(), 100), ("某书外传".to_string(), 101)])
    );
    assert_eq!(lookup.to_string(), "某书:100\n某书外传:101");
}

#[tokio::test]
async fn test_search_book_by_name_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>暂无结果</body></html>"))
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    let lookup = harvester.search_book_by_name("不存在的书").await.unwrap();

    assert_eq!(lookup, SearchLookup::NotFound);
    assert_eq!(lookup.to_string(), "未能搜到该书籍");
}

#[tokio::test]
async fn test_search_error_is_surfaced_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    assert!(harvester.search_book_by_name("某书").await.is_err());
}

#[tokio::test]
async fn test_search_books_page() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><body><ul>
        <li data-book-id="5">
            <p class="tit"><a href="/book/5">第五本</a></p>
            <p>小说作者：<a href="/reader/9">作者乙</a></p>
            <p>最近更新：2024-02-02 02:02:02 / 终章</p>
            <div class="desc">简介</div>
        </li>
        </ul></body></html>"#;

    Mock::given(method("GET"))
        .and(path_regex(r"^/get-search-book-list/0-0-0-0-0-0/[^/]+/[^/]+/2$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    let items = harvester.search_books("第五", 2).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "第五本");
    assert_eq!(items[0].author, "作者乙");
    assert_eq!(items[0].description, "简介");
    assert_eq!(items[0].read_url, format!("{}/book/5", mock_server.uri()));
}

#[tokio::test]
async fn test_get_book_details() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><body>
        <div class="breadcrumb"><a href="/">首页</a> &gt; 测试之书</div>
        <h1 class="title">测试之书 <a href="/reader/1">作者丙</a></h1>
        <p class="book-grade"><b>5万</b><b>300</b><b>80万</b></p>
        <div class="cover ly-fl"><img src="/cover/3.jpg"></div>
        </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/book/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    let book = harvester.get_book_details(3).await.unwrap();

    assert_eq!(book.title, "测试之书");
    assert_eq!(book.author, "作者丙");
    assert_eq!(book.stats[STAT_TOTAL_CLICKS], Metric::Number(50000.0));
    assert_eq!(book.cover_url, format!("{}/cover/3.jpg", mock_server.uri()));
    assert_eq!(book.latest_update_ts, UNKNOWN_TIMESTAMP);
    assert_eq!(book.intro, "");
}

#[tokio::test]
async fn test_get_book_details_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/book/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let harvester = Harvester::new(create_test_config(&mock_server.uri())).unwrap();
    assert!(harvester.get_book_details(4).await.is_err());
}
