//! Read-side roster projection.
//!
//! # Responsibility
//! - Rebuild the dense, ordered display list from sparse slot storage.
//! - Resolve the anchor's account, bio and recent articles.
//!
//! # Invariants
//! - Deleted indices never appear in the output, whatever their stored
//!   fields hold.
//! - Entries keep ascending slot order; no other sort is applied.
//! - An unresolvable reference degrades to an empty value; it never fails
//!   the page render.

use crate::lookup::{ContentItem, ContentQuery, EntityLookup, UserEntity};
use crate::model::roster::EntityId;
use crate::repo::roster_repo;
use crate::store::{ConfigStore, StoreResult};
use log::{info, warn};

/// Client-side asset bundle attached to the rendered page.
pub const ROSTER_ASSET_BUNDLE: &str = "aboutpage/roster_styles";

const ARTICLE_KIND: &str = "article";
const ANCHOR_BIO_FIELD: &str = "description";
const RECENT_ARTICLES_LIMIT: u32 = 3;

/// One active roster slot, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub leader_name: String,
    pub designation: String,
    pub linkedin_link: String,
    /// Resolved image URL; empty when no image is set or the reference no
    /// longer resolves.
    pub profile_image_url: String,
}

/// Full display contract consumed by the template layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPayload {
    /// Active slots in ascending slot order.
    pub entries: Vec<DisplayEntry>,
    /// Anchor account name; empty when the reference does not resolve.
    pub anchor_name: String,
    /// Anchor bio; empty when absent or unresolvable.
    pub anchor_bio: String,
    /// Up to three published articles by the anchor, newest first.
    pub latest_news: Vec<ContentItem>,
    /// Invalidation tag: any configuration save invalidates this payload.
    pub cache_tag: String,
    /// Client asset bundle reference.
    pub asset_bundle: &'static str,
}

/// Projection service over the store and lookup seams.
pub struct RosterProjector<S: ConfigStore, L: EntityLookup> {
    store: S,
    lookup: L,
}

impl<S: ConfigStore, L: EntityLookup> RosterProjector<S, L> {
    /// Creates a projector using the provided seam implementations.
    pub fn new(store: S, lookup: L) -> Self {
        Self { store, lookup }
    }

    /// Builds the display payload for one page view.
    ///
    /// Pure read: identical persisted state and lookup responses yield an
    /// identical payload. Storage read failures propagate; lookup failures
    /// degrade to absent values.
    pub fn project(&self) -> StoreResult<DisplayPayload> {
        let config = roster_repo::read_roster(&self.store)?;

        let mut entries = Vec::new();
        for index in config.active_indices() {
            let record = roster_repo::read_leader(&self.store, index)?;
            let profile_image_url = match record.profile_image {
                Some(file_id) => self.resolve_file_url(file_id),
                None => String::new(),
            };
            entries.push(DisplayEntry {
                leader_name: record.name,
                designation: record.designation,
                linkedin_link: record.linkedin_link,
                profile_image_url,
            });
        }

        let mut anchor_name = String::new();
        let mut anchor_bio = String::new();
        let mut latest_news = Vec::new();
        if let Some(anchor_id) = config.anchor {
            if let Some(user) = self.resolve_user(anchor_id) {
                anchor_name = user.account_name;
                anchor_bio = user
                    .fields
                    .get(ANCHOR_BIO_FIELD)
                    .cloned()
                    .unwrap_or_default();
                latest_news = self.recent_articles(anchor_id);
            }
        }

        info!(
            "event=roster_project module=projector status=ok entries={} articles={}",
            entries.len(),
            latest_news.len()
        );
        Ok(DisplayPayload {
            entries,
            anchor_name,
            anchor_bio,
            latest_news,
            cache_tag: self.store.cache_tag().to_string(),
            asset_bundle: ROSTER_ASSET_BUNDLE,
        })
    }

    fn resolve_file_url(&self, id: EntityId) -> String {
        match self.lookup.load_file(id) {
            Ok(Some(file)) => file.to_url(),
            Ok(None) => String::new(),
            Err(err) => {
                warn!("event=lookup_miss module=projector kind=file id={id} error={err}");
                String::new()
            }
        }
    }

    fn resolve_user(&self, id: EntityId) -> Option<UserEntity> {
        match self.lookup.load_user(id) {
            Ok(user) => user,
            Err(err) => {
                warn!("event=lookup_miss module=projector kind=user id={id} error={err}");
                None
            }
        }
    }

    fn recent_articles(&self, author: EntityId) -> Vec<ContentItem> {
        let query = ContentQuery {
            kind: ARTICLE_KIND.to_string(),
            published: true,
            author,
            limit: RECENT_ARTICLES_LIMIT,
        };

        let ids = match self.lookup.query_content(&query) {
            Ok(ids) => ids,
            Err(err) => {
                warn!("event=lookup_miss module=projector kind=content author={author} error={err}");
                return Vec::new();
            }
        };

        match self.lookup.load_content(&ids) {
            Ok(items) => items,
            Err(err) => {
                warn!("event=lookup_miss module=projector kind=content author={author} error={err}");
                Vec::new()
            }
        }
    }
}
