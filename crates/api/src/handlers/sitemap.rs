//! Sitemap generation from the static routes, published prompts, and tags.

use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use promptlib_core::types::Timestamp;
use promptlib_db::repositories::{PromptRepo, TagRepo};

use crate::error::AppResult;
use crate::response::xml_document;
use crate::state::AppState;

/// One `<url>` element of the sitemap.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: Timestamp,
    pub change_frequency: &'static str,
    pub priority: &'static str,
}

/// GET /sitemap.xml
///
/// Urlset covering the home page, every public prompt, and every tag.
pub async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let base = &state.config.public_base_url;

    let mut entries = vec![SitemapEntry {
        url: format!("{base}/"),
        last_modified: Utc::now(),
        change_frequency: "daily",
        priority: "1.0",
    }];

    for (id, updated_at) in PromptRepo::public_sitemap_entries(&state.pool).await? {
        entries.push(SitemapEntry {
            url: format!("{base}/prompts/{id}"),
            last_modified: updated_at,
            change_frequency: "weekly",
            priority: "0.8",
        });
    }

    for tag in TagRepo::list_all(&state.pool).await? {
        entries.push(SitemapEntry {
            url: format!("{base}/tags/{}", tag.slug),
            last_modified: tag.created_at,
            change_frequency: "weekly",
            priority: "0.5",
        });
    }

    Ok(xml_document(build_urlset(&entries)))
}

/// Render entries as a sitemap-protocol urlset document.
fn build_urlset(entries: &[SitemapEntry]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        out.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            xml_escape(&entry.url),
            entry.last_modified.format("%Y-%m-%d"),
            entry.change_frequency,
            entry.priority,
        ));
    }
    out.push_str("</urlset>\n");
    out
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn urlset_contains_one_url_element_per_entry() {
        let when = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let entries = vec![
            SitemapEntry {
                url: "https://example.com/".to_string(),
                last_modified: when,
                change_frequency: "daily",
                priority: "1.0",
            },
            SitemapEntry {
                url: "https://example.com/prompts/7".to_string(),
                last_modified: when,
                change_frequency: "weekly",
                priority: "0.8",
            },
        ];

        let xml = build_urlset(&entries);
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/prompts/7</loc>"));
        assert!(xml.contains("<lastmod>2026-03-14</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn ampersands_in_urls_are_escaped() {
        let entries = vec![SitemapEntry {
            url: "https://example.com/?a=1&b=2".to_string(),
            last_modified: Utc::now(),
            change_frequency: "daily",
            priority: "1.0",
        }];
        let xml = build_urlset(&entries);
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
