use super::guide::{fetch_guide_items, GuideItem};
use crate::core::config::{FeedConfig, SiteConfig};
use crate::http::HttpTransport;
use std::fmt::Write as _;

/// Top-level pages, with their priority
const STATIC_PAGES: [(&str, &str); 4] = [("", "1.0"), ("/en/", "0.8"), ("/zh/", "0.8"), ("/zh-tw/", "0.8")];

/// Locale prefixes that get a detail page per guide item
const DETAIL_LOCALES: [&str; 2] = ["en", "zh"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Every URL of the sitemap: the static pages, then two detail pages per item
pub fn entries(site_url: &str, items: &[GuideItem]) -> Vec<SitemapEntry> {
    let site_url = site_url.trim_end_matches('/');

    let static_pages = STATIC_PAGES.iter().map(|&(page, priority)| SitemapEntry {
        loc: format!("{}{}", site_url, page),
        changefreq: "weekly",
        priority,
    });

    let details = items
        .iter()
        .filter(|item| {
            if item.slug.is_empty() {
                log::warn!("guide item {} has no usable slug, skipping", item.item_id);
            }
            !item.slug.is_empty()
        })
        .flat_map(|item| {
            DETAIL_LOCALES.iter().map(move |locale| SitemapEntry {
                loc: format!("{}/{}/spot/{}/", site_url, locale, item.slug),
                changefreq: "monthly",
                priority: "0.6",
            })
        });

    static_pages.chain(details).collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders the sitemap document
pub fn generate(site_url: &str, items: &[GuideItem]) -> String {
    let entries = entries(site_url, items);

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in &entries {
        // Writing into a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape_xml(&entry.loc),
            entry.changefreq,
            entry.priority
        );
    }
    xml.push_str("</urlset>");

    log::info!("sitemap generated with {} URLs", entries.len());
    xml
}

/// Fetches the guide items and renders the sitemap.
///
/// A feed failure still produces a sitemap of the static pages.
pub async fn build(transport: &dyn HttpTransport, feed: &FeedConfig, site: &SiteConfig) -> String {
    let items = fetch_guide_items(transport, feed).await;
    generate(&site.site_url, &items)
}
