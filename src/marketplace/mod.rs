//! Marketplace client contract
//!
//! The editor hands finished descriptions to a marketplace through
//! [`MarketplaceClient`]. Authentication and transport belong to the
//! implementation; this module only fixes the payload shape and the batch
//! semantics: one failed listing never aborts the rest.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::PLACEHOLDER_HTML;

/// Number of listings requested per page by [`MarketplaceClient::apply_to_all`]
pub const LISTING_PAGE_SIZE: usize = 100;

/// Price as the marketplace reports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub value: String,
    pub currency: String,
}

/// An active listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub item_id: String,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub images: Vec<String>,
    pub view_item_url: String,
}

/// One page of active listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub total: usize,
    pub has_more: bool,
}

/// A listing whose update failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub item_id: String,
    pub error: String,
}

/// Result of applying a description to many listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub successful: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl ApplyReport {
    /// Number of listings attempted
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    /// Whether every listing was updated
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Marketplace errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketplaceError {
    /// Credentials missing or expired
    #[error("Not authorized with the marketplace")]
    Unauthorized,

    /// The marketplace refused the update
    #[error("Listing {item_id} rejected: {reason}")]
    Rejected { item_id: String, reason: String },

    /// Request could not be completed
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Build the description payload for a listing: the stylesheet in a
/// `<style>` element followed by the markup.
///
/// Blank markup is replaced by the placeholder document so a listing never
/// receives an empty description. The `<style>` element is omitted when the
/// stylesheet is blank.
pub fn render_listing_description(html: &str, css: &str) -> String {
    let html = if html.trim().is_empty() { PLACEHOLDER_HTML } else { html };
    if css.trim().is_empty() {
        html.to_string()
    } else {
        format!("<style>\n{}\n</style>\n{}", css.trim(), html)
    }
}

/// A marketplace account the editor can publish descriptions to
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// Fetch one page of active listings
    async fn fetch_listings(&self, limit: usize, offset: usize) -> Result<ListingPage, MarketplaceError>;

    /// Replace the description of one listing
    async fn update_description(&self, item_id: &str, description: &str) -> Result<(), MarketplaceError>;

    /// Apply a template to each listing in turn.
    ///
    /// `on_progress(completed, total)` is called after every listing,
    /// successful or not. Failures are collected in the report.
    async fn apply_to_many(
        &self,
        item_ids: &[String],
        html: &str,
        css: &str,
        on_progress: &mut (dyn FnMut(usize, usize) + Send),
    ) -> ApplyReport {
        let description = render_listing_description(html, css);
        let total = item_ids.len();
        let mut report = ApplyReport::default();

        for (done, item_id) in item_ids.iter().enumerate() {
            match self.update_description(item_id, &description).await {
                Ok(()) => report.successful.push(item_id.clone()),
                Err(e) => {
                    tracing::warn!(item_id = %item_id, %e, "listing update failed");
                    report.failed.push(FailedItem {
                        item_id: item_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
            on_progress(done + 1, total);
        }

        report
    }

    /// Apply a template to every active listing
    async fn apply_to_all(
        &self,
        html: &str,
        css: &str,
        on_progress: &mut (dyn FnMut(usize, usize) + Send),
    ) -> Result<ApplyReport, MarketplaceError> {
        let mut item_ids = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.fetch_listings(LISTING_PAGE_SIZE, offset).await?;
            let fetched = page.listings.len();
            item_ids.extend(page.listings.into_iter().map(|l| l.item_id));
            offset += fetched;
            if !page.has_more || fetched == 0 {
                break;
            }
        }
        tracing::debug!(listings = item_ids.len(), "applying template to all listings");
        Ok(self.apply_to_many(&item_ids, html, css, on_progress).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_wraps_css() {
        let out = render_listing_description("<h1>x</h1>", " h1 { color: red; } ");
        assert_eq!(out, "<style>\nh1 { color: red; }\n</style>\n<h1>x</h1>");
    }

    #[test]
    fn test_blank_html_becomes_placeholder() {
        assert_eq!(render_listing_description("  ", ""), PLACEHOLDER_HTML);
    }

    #[test]
    fn test_report_counts() {
        let report = ApplyReport {
            successful: vec!["1".into()],
            failed: vec![FailedItem {
                item_id: "2".into(),
                error: "nope".into(),
            }],
        };
        assert_eq!(report.total(), 2);
        assert!(!report.is_complete_success());
    }
}
