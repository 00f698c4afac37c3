use axum::http::Uri;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::http::AppError;

const PAGE_PARAM: &str = "page";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 1-based page position resolved against the configured page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    size: i64,
}

impl PageRequest {
    pub fn parse(page: Option<&str>, size: i64) -> Result<Self, AppError> {
        let number = match page.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|number| *number >= 1)
                .ok_or_else(invalid_page)?,
        };

        Ok(Self {
            number,
            size: size.max(1),
        })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps one page of `results` out of `count` rows. Links reuse the
    /// request path and its other query parameters.
    pub fn new(
        request: PageRequest,
        uri: &Uri,
        count: i64,
        results: Vec<T>,
    ) -> Result<Self, AppError> {
        if request.number > 1 && request.offset() >= count {
            return Err(invalid_page());
        }

        let next = (request.offset() + (results.len() as i64) < count)
            .then(|| page_link(uri, request.number + 1));
        let previous = (request.number > 1).then(|| page_link(uri, request.number - 1));

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }
}

fn invalid_page() -> AppError {
    AppError::not_found("invalid page")
}

fn page_link(uri: &Uri, number: i64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(existing) = uri.query() {
        for (key, value) in form_urlencoded::parse(existing.as_bytes()) {
            if key != PAGE_PARAM {
                query.append_pair(&key, &value);
            }
        }
    }
    if number > 1 {
        query.append_pair(PAGE_PARAM, &number.to_string());
    }

    let query = query.finish();
    if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn uri(raw: &str) -> Uri {
        raw.parse().expect("uri")
    }

    #[test]
    fn defaults_to_first_page() {
        let request = PageRequest::parse(None, 10).expect("page");
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn rejects_non_positive_and_garbage_pages() {
        for raw in ["0", "-2", "abc"] {
            let err = PageRequest::parse(Some(raw), 10).expect_err("invalid page");
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn middle_page_links_both_ways() {
        let request = PageRequest::parse(Some("2"), 10).expect("page");
        let page = Page::new(request, &uri("/api/users/?page=2"), 25, vec![0; 10]).expect("page");
        assert_eq!(page.next.as_deref(), Some("/api/users/?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/users/"));
    }

    #[test]
    fn links_keep_other_filters() {
        let request = PageRequest::parse(Some("1"), 2).expect("page");
        let page = Page::new(request, &uri("/api/comments/?post__id=abc&page=1"), 3, vec![0; 2])
            .expect("page");
        assert_eq!(page.next.as_deref(), Some("/api/comments/?post__id=abc&page=2"));
        assert_eq!(page.previous, None);
    }

    #[test]
    fn last_page_has_no_next() {
        let request = PageRequest::parse(Some("3"), 10).expect("page");
        let page = Page::new(request, &uri("/api/posts/?page=3"), 25, vec![0; 5]).expect("page");
        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/api/posts/?page=2"));
    }

    #[test]
    fn empty_first_page_is_valid() {
        let request = PageRequest::parse(None, 10).expect("page");
        let page: Page<i32> = Page::new(request, &uri("/api/chats/"), 0, Vec::new()).expect("page");
        assert_eq!(page.count, 0);
        assert_eq!(page.next, None);
    }

    #[test]
    fn page_past_the_end_is_not_found() {
        let request = PageRequest::parse(Some("4"), 10).expect("page");
        let err = Page::<i32>::new(request, &uri("/api/posts/?page=4"), 25, Vec::new())
            .expect_err("out of range");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
