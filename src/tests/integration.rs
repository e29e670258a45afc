//! Integration tests: store → editor session → marketplace
//!
//! These tests simulate the full publishing flow:
//!   Template (store) → EditorSession (edit blocks) → save → render →
//!   MarketplaceClient (apply to listings)

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::marketplace::{
        render_listing_description, Listing, ListingPage, MarketplaceClient, MarketplaceError,
    };
    use crate::runtime::session::EditorSession;
    use crate::store::{InMemoryTemplateStore, TemplateDraft};

    /// Marketplace double: records descriptions, rejects chosen items
    struct MockMarketplace {
        listings: Vec<String>,
        rejected: HashSet<String>,
        descriptions: Mutex<HashMap<String, String>>,
        page_requests: Mutex<Vec<(usize, usize)>>,
    }

    impl MockMarketplace {
        fn new(count: usize, rejected: &[&str]) -> Self {
            Self {
                listings: (0..count).map(|i| format!("item-{}", i)).collect(),
                rejected: rejected.iter().map(|s| s.to_string()).collect(),
                descriptions: Mutex::new(HashMap::new()),
                page_requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MarketplaceClient for MockMarketplace {
        async fn fetch_listings(&self, limit: usize, offset: usize) -> Result<ListingPage, MarketplaceError> {
            self.page_requests.lock().push((limit, offset));
            let listings: Vec<Listing> = self
                .listings
                .iter()
                .skip(offset)
                .take(limit)
                .map(|id| Listing {
                    item_id: id.clone(),
                    title: format!("Listing {}", id),
                    ..Listing::default()
                })
                .collect();
            let has_more = offset + listings.len() < self.listings.len();
            Ok(ListingPage {
                listings,
                total: self.listings.len(),
                has_more,
            })
        }

        async fn update_description(&self, item_id: &str, description: &str) -> Result<(), MarketplaceError> {
            if self.rejected.contains(item_id) {
                return Err(MarketplaceError::Rejected {
                    item_id: item_id.to_string(),
                    reason: "listing ended".into(),
                });
            }
            self.descriptions
                .lock()
                .insert(item_id.to_string(), description.to_string());
            Ok(())
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// One rejected listing does not stop the others
    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let client = MockMarketplace::new(3, &["item-1"]);
        let mut progress = Vec::new();
        let report = client
            .apply_to_many(
                &ids(&["item-0", "item-1", "item-2"]),
                "<h1>Widget</h1>",
                "h1 { color: red; }",
                &mut |done, total| progress.push((done, total)),
            )
            .await;

        assert_eq!(report.successful, ids(&["item-0", "item-2"]));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].item_id, "item-1");
        assert!(report.failed[0].error.contains("listing ended"));
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);

        let descriptions = client.descriptions.lock();
        assert!(descriptions["item-0"].starts_with("<style>"));
        assert!(descriptions["item-2"].ends_with("<h1>Widget</h1>"));
    }

    /// Apply-to-all pages through every listing first
    #[tokio::test]
    async fn test_apply_to_all_pages() {
        let client = MockMarketplace::new(150, &[]);
        let mut calls = 0;
        let report = client
            .apply_to_all("<p>x</p>", "", &mut |_, _| calls += 1)
            .await
            .unwrap();

        assert_eq!(report.successful.len(), 150);
        assert!(report.is_complete_success());
        assert_eq!(calls, 150);
        assert_eq!(*client.page_requests.lock(), vec![(100, 0), (100, 100)]);
    }

    /// An empty batch reports nothing and never calls progress
    #[tokio::test]
    async fn test_empty_batch() {
        let client = MockMarketplace::new(0, &[]);
        let mut calls = 0;
        let report = client.apply_to_many(&[], "<p>x</p>", "", &mut |_, _| calls += 1).await;
        assert_eq!(report.total(), 0);
        assert_eq!(calls, 0);
    }

    /// Edit a stored template, save it, and publish it
    #[tokio::test]
    async fn test_edit_save_publish() {
        let store = InMemoryTemplateStore::new();
        let mut draft = TemplateDraft::new(
            "Classic",
            r#"<h1 class="ebay-title">[name]</h1><div class="ebay-description">[description]</div>"#,
        );
        draft.css_content = ".ebay-title { color: #333; }".into();
        let template = store.create(draft);

        let mut session = EditorSession::open(&store, &template.id).unwrap();
        session.append_template("ebay-shipping").unwrap();
        session.remove(1);
        let saved = session.save_into(&store, &template.id).unwrap();
        assert_eq!(session.len(), 2);

        let client = MockMarketplace::new(2, &[]);
        let report = client
            .apply_to_many(
                &ids(&["item-0", "item-1"]),
                &saved.html_content,
                &saved.css_content,
                &mut |_, _| {},
            )
            .await;
        assert_eq!(report.successful.len(), 2);

        let expected = render_listing_description(&saved.html_content, &saved.css_content);
        assert_eq!(client.descriptions.lock()["item-1"], expected);
        assert!(!expected.contains("[description]"));
        assert!(expected.contains("[name]"));
    }

    /// Publishing an emptied template sends the placeholder, never an empty body
    #[tokio::test]
    async fn test_publish_empty_session() {
        let mut session = EditorSession::from_html("<p>only</p>");
        session.remove(0);

        let client = MockMarketplace::new(1, &[]);
        client
            .apply_to_many(&ids(&["item-0"]), session.document(), "", &mut |_, _| {})
            .await;
        assert!(client.descriptions.lock()["item-0"].contains("data-placeholder"));
    }
}
