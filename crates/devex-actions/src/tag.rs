//! Tag operations: searchable listing, per-tag question feeds, and the
//! popular-tags aggregation.

use tracing::warn;

use devex_model::{Question, Tag};
use devex_store::Query;
use devex_types::{Paged, Pagination, TagId};

use crate::error::{ActionError, ActionResult};
use crate::exchange::DevExchange;
use crate::views::{self, QuestionView, TagSummary, TagView};

/// How many tags [`DevExchange::top_popular_tags`] returns.
pub const TOP_TAG_LIMIT: usize = 5;

/// Orderings for [`DevExchange::get_all_tags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TagSort {
    /// Largest question set first.
    #[default]
    Popular,
    Recent,
    Name,
    Old,
}

/// Parameters for [`DevExchange::get_all_tags`].
#[derive(Clone, Debug, Default)]
pub struct GetAllTagsParams {
    /// Case-insensitive substring match on the tag name.
    pub search: Option<String>,
    pub sort: TagSort,
    pub pagination: Pagination,
}

/// Parameters for [`DevExchange::get_questions_by_tag`].
#[derive(Clone, Debug)]
pub struct GetQuestionsByTagParams {
    pub tag_id: TagId,
    /// Case-insensitive substring match on question titles.
    pub search: Option<String>,
    pub pagination: Pagination,
}

/// One tag's question feed.
#[derive(Clone, Debug, PartialEq)]
pub struct TagQuestions {
    pub tag: TagSummary,
    pub questions: Paged<QuestionView>,
}

// ---- Tag operations ----

impl DevExchange {
    /// All tags with question counts, searchable, sorted, paginated.
    pub fn get_all_tags(&self, params: GetAllTagsParams) -> Paged<TagView> {
        let GetAllTagsParams {
            search,
            sort,
            pagination,
        } = params;
        let needle = search.map(|s| s.to_lowercase());
        let matches = |t: &Tag| {
            needle
                .as_ref()
                .map_or(true, |n| t.name.to_lowercase().contains(n))
        };

        let total = self.db.tags().count(&matches);
        let tags = self.db.tags().find(
            Query::new()
                .filter(&matches)
                .sort_by(move |a: &Tag, b: &Tag| match sort {
                    TagSort::Popular => b.question_count().cmp(&a.question_count()),
                    TagSort::Recent => b.created_at.cmp(&a.created_at),
                    TagSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                    TagSort::Old => a.created_at.cmp(&b.created_at),
                })
                .paginate(&pagination),
        );
        let items = tags.iter().map(TagView::of).collect();
        Paged::new(items, total, &pagination)
    }

    /// One tag's linked questions, newest first, with optional title search
    /// and pagination applied to the linked set. The tag itself must exist.
    pub fn get_questions_by_tag(
        &self,
        params: GetQuestionsByTagParams,
    ) -> ActionResult<TagQuestions> {
        let GetQuestionsByTagParams {
            tag_id,
            search,
            pagination,
        } = params;
        let tag = self.db.tags().get(tag_id).ok_or_else(|| {
            warn!(tag = %tag_id.short_id(), "tag not found");
            ActionError::TagNotFound
        })?;

        let needle = search.map(|s| s.to_lowercase());
        let matches = |q: &Question| {
            tag.questions.contains(&q.id)
                && needle
                    .as_ref()
                    .map_or(true, |n| q.title.to_lowercase().contains(n))
        };

        let total = self.db.questions().count(&matches);
        let questions = self.db.questions().find(
            Query::new()
                .filter(&matches)
                .sort_by(|a: &Question, b: &Question| b.created_at.cmp(&a.created_at))
                .paginate(&pagination),
        );
        let items = views::resolve_questions(&self.db, &questions)?;
        Ok(TagQuestions {
            tag: TagSummary::of(&tag),
            questions: Paged::new(items, total, &pagination),
        })
    }

    /// The five tags with the largest question sets, descending.
    pub fn top_popular_tags(&self) -> Vec<TagView> {
        self.db
            .tags()
            .find(
                Query::new()
                    .sort_by(|a: &Tag, b: &Tag| b.question_count().cmp(&a.question_count()))
                    .limit(TOP_TAG_LIMIT),
            )
            .iter()
            .map(TagView::of)
            .collect()
    }
}
