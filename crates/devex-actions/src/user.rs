//! User operations: accounts, profile updates, listings, saved questions,
//! stats and badges, and the cascading delete.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use devex_badges::{assign_badges, BadgeCounts, BadgeCriterion, CriterionCount};
use devex_model::{Answer, Question, User};
use devex_store::Query;
use devex_types::{AuthId, Paged, Pagination, QuestionId, UserId};

use crate::error::{ActionError, ActionResult};
use crate::exchange::DevExchange;
use crate::views::{self, AnswerView, QuestionView};

/// Parameters for [`DevExchange::create_user`].
#[derive(Clone, Debug)]
pub struct CreateUserParams {
    pub auth_id: AuthId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
}

/// Partial profile update. `None` leaves a field untouched; for the
/// optional profile fields (bio, location, portfolio) an empty string
/// clears the field.
#[derive(Clone, Debug, Default)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio: Option<String>,
}

/// Parameters for [`DevExchange::update_user`].
#[derive(Clone, Debug)]
pub struct UpdateUserParams {
    pub auth_id: AuthId,
    pub update: UserProfileUpdate,
}

/// Orderings for [`DevExchange::get_all_users`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UserSort {
    /// Most recent join first.
    #[default]
    NewUsers,
    OldUsers,
    /// Reputation descending.
    TopContributors,
}

/// Parameters for [`DevExchange::get_all_users`].
#[derive(Clone, Debug, Default)]
pub struct GetAllUsersParams {
    /// Case-insensitive substring match on name or username.
    pub search: Option<String>,
    pub sort: UserSort,
    pub pagination: Pagination,
}

/// Parameters for [`DevExchange::toggle_save_question`].
#[derive(Clone, Copy, Debug)]
pub struct ToggleSaveQuestionParams {
    pub user_id: UserId,
    pub question_id: QuestionId,
}

/// Orderings for [`DevExchange::get_saved_questions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SavedQuestionSort {
    #[default]
    MostRecent,
    Oldest,
    MostVoted,
    MostViewed,
    MostAnswered,
}

/// Parameters for [`DevExchange::get_saved_questions`].
#[derive(Clone, Debug)]
pub struct GetSavedQuestionsParams {
    pub auth_id: AuthId,
    /// Case-insensitive substring match on question titles.
    pub search: Option<String>,
    pub sort: SavedQuestionSort,
    pub pagination: Pagination,
}

/// Parameters for [`DevExchange::get_user_questions`] and
/// [`DevExchange::get_user_answers`].
#[derive(Clone, Copy, Debug)]
pub struct GetUserStatsParams {
    pub user_id: UserId,
    pub pagination: Pagination,
}

/// Profile summary: activity totals and badge credits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user: User,
    pub total_questions: usize,
    pub total_answers: usize,
    pub badges: BadgeCounts,
    pub reputation: i64,
}

// ---- User operations ----

impl DevExchange {
    /// Look up a user by external-auth id.
    pub fn get_user(&self, auth_id: &AuthId) -> ActionResult<User> {
        self.db
            .users()
            .find_one(|u| &u.auth_id == auth_id)
            .ok_or_else(|| {
                warn!(%auth_id, "user not found");
                ActionError::UserNotFound
            })
    }

    /// Register a user on first external-auth sign-in. Auth id, username,
    /// and email must all be unused.
    pub fn create_user(&self, params: CreateUserParams) -> ActionResult<User> {
        let CreateUserParams {
            auth_id,
            name,
            username,
            email,
            picture,
        } = params;
        let username = username.trim().to_owned();
        let email = email.trim().to_owned();
        if username.is_empty() {
            return Err(ActionError::validation("username must not be empty"));
        }
        if email.is_empty() {
            return Err(ActionError::validation("email must not be empty"));
        }
        self.check_unique_fields(&auth_id, &username, &email, None)?;

        let user = User::new(auth_id, name, username, email, picture);
        let id = self.db.users().insert(user.clone())?;
        debug!(user = %id.short_id(), username = %user.username, "user created");
        Ok(user)
    }

    /// Apply a partial profile update. Username and email changes re-check
    /// uniqueness against everyone else.
    pub fn update_user(&self, params: UpdateUserParams) -> ActionResult<User> {
        let UpdateUserParams { auth_id, update } = params;
        let current = self.get_user(&auth_id)?;

        if let Some(username) = &update.username {
            if username.trim().is_empty() {
                return Err(ActionError::validation("username must not be empty"));
            }
        }
        if let Some(email) = &update.email {
            if email.trim().is_empty() {
                return Err(ActionError::validation("email must not be empty"));
            }
        }
        self.check_unique_fields(
            &auth_id,
            update.username.as_deref().unwrap_or(&current.username),
            update.email.as_deref().unwrap_or(&current.email),
            Some(current.id),
        )?;

        let (user, _) = self
            .db
            .users()
            .update(current.id, |u| {
                if let Some(name) = &update.name {
                    u.name = name.clone();
                }
                if let Some(username) = &update.username {
                    u.username = username.trim().to_owned();
                }
                if let Some(email) = &update.email {
                    u.email = email.trim().to_owned();
                }
                if let Some(picture) = &update.picture {
                    u.picture = picture.clone();
                }
                if let Some(bio) = &update.bio {
                    u.bio = non_empty(bio);
                }
                if let Some(location) = &update.location {
                    u.location = non_empty(location);
                }
                if let Some(portfolio) = &update.portfolio {
                    u.portfolio = non_empty(portfolio);
                }
            })
            .ok_or(ActionError::UserNotFound)?;
        debug!(user = %user.id.short_id(), "profile updated");
        Ok(user)
    }

    fn check_unique_fields(
        &self,
        auth_id: &AuthId,
        username: &str,
        email: &str,
        exclude: Option<UserId>,
    ) -> ActionResult<()> {
        let taken = |field: &'static str, pred: &dyn Fn(&User) -> bool| {
            let hit = self
                .db
                .users()
                .find_one(|u| exclude != Some(u.id) && pred(u));
            match hit {
                Some(_) => {
                    warn!(field, "unique field already taken");
                    Err(ActionError::Conflict { field })
                }
                None => Ok(()),
            }
        };
        taken("auth id", &|u| &u.auth_id == auth_id)?;
        taken("username", &|u| u.username == username)?;
        taken("email", &|u| u.email == email)?;
        Ok(())
    }

    /// Remove a user and cascade to their authored questions (and those
    /// questions' answers, tag links, and saved references). Answers the
    /// user posted on other users' questions survive with an unresolvable
    /// author. Returns the deleted record.
    pub fn delete_user(&self, auth_id: &AuthId) -> ActionResult<User> {
        let user = self.get_user(auth_id)?;
        let authored = self
            .db
            .questions()
            .find(Query::new().filter(|q: &Question| q.author == user.id));
        for question in &authored {
            self.remove_question_record(question);
        }
        self.db.users().delete(user.id);
        debug!(
            user = %user.id.short_id(),
            questions = authored.len(),
            "user deleted"
        );
        Ok(user)
    }

    /// All users, searchable over name and username, sorted, paginated.
    pub fn get_all_users(&self, params: GetAllUsersParams) -> Paged<User> {
        let GetAllUsersParams {
            search,
            sort,
            pagination,
        } = params;
        let needle = search.map(|s| s.to_lowercase());
        let matches = |u: &User| {
            needle.as_ref().map_or(true, |n| {
                u.name.to_lowercase().contains(n) || u.username.to_lowercase().contains(n)
            })
        };

        let total = self.db.users().count(&matches);
        let items = self.db.users().find(
            Query::new()
                .filter(&matches)
                .sort_by(move |a: &User, b: &User| match sort {
                    UserSort::NewUsers => b.joined_at.cmp(&a.joined_at),
                    UserSort::OldUsers => a.joined_at.cmp(&b.joined_at),
                    UserSort::TopContributors => b.reputation.cmp(&a.reputation),
                })
                .paginate(&pagination),
        );
        Paged::new(items, total, &pagination)
    }

    /// Toggle a question in the user's saved set. Returns whether the
    /// question is saved after the toggle. Idempotent in pairs: any number
    /// of toggles leaves at most one entry.
    pub fn toggle_save_question(&self, params: ToggleSaveQuestionParams) -> ActionResult<bool> {
        let ToggleSaveQuestionParams {
            user_id,
            question_id,
        } = params;
        if !self.db.questions().contains(question_id) {
            warn!(question = %question_id.short_id(), "question not found for save");
            return Err(ActionError::QuestionNotFound);
        }
        let (_, saved_now) = self
            .db
            .users()
            .update(user_id, |u| {
                if u.saved.remove(&question_id) {
                    false
                } else {
                    u.saved.insert(question_id);
                    true
                }
            })
            .ok_or_else(|| {
                warn!(user = %user_id.short_id(), "user not found for save");
                ActionError::UserNotFound
            })?;
        debug!(
            user = %user_id.short_id(),
            question = %question_id.short_id(),
            saved = saved_now,
            "save toggled"
        );
        Ok(saved_now)
    }

    /// The user's saved questions, with title search, sort, and pagination
    /// applied to the saved set itself, and tags/author resolved on each
    /// returned question.
    pub fn get_saved_questions(
        &self,
        params: GetSavedQuestionsParams,
    ) -> ActionResult<Paged<QuestionView>> {
        let GetSavedQuestionsParams {
            auth_id,
            search,
            sort,
            pagination,
        } = params;
        let user = self.get_user(&auth_id)?;

        let needle = search.map(|s| s.to_lowercase());
        let mut saved: Vec<Question> = user
            .saved
            .iter()
            .filter_map(|id| self.db.questions().get(*id))
            .filter(|q| {
                needle
                    .as_ref()
                    .map_or(true, |n| q.title.to_lowercase().contains(n))
            })
            .collect();
        let total = saved.len();

        match sort {
            SavedQuestionSort::MostRecent => saved.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SavedQuestionSort::Oldest => saved.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SavedQuestionSort::MostVoted => {
                saved.sort_by(|a, b| b.upvote_count().cmp(&a.upvote_count()))
            }
            SavedQuestionSort::MostViewed => saved.sort_by(|a, b| b.views.cmp(&a.views)),
            SavedQuestionSort::MostAnswered => saved.sort_by_key(|q| {
                std::cmp::Reverse(self.db.answers().count(|a| a.question == q.id))
            }),
        }

        let p = pagination.normalized();
        let window: Vec<Question> = saved.into_iter().skip(p.skip()).take(p.page_size).collect();
        let items = views::resolve_questions(&self.db, &window)?;
        Ok(Paged::new(items, total, &pagination))
    }

    /// Profile stats: authored question/answer counts, received upvotes,
    /// accumulated views, and the badge credits those counts earn.
    pub fn get_user_info(&self, auth_id: &AuthId) -> ActionResult<UserInfo> {
        let user = self.get_user(auth_id)?;

        let total_questions = self.db.questions().count(|q| q.author == user.id);
        let total_answers = self.db.answers().count(|a| a.author == user.id);
        let authored_questions = self
            .db
            .questions()
            .find(Query::new().filter(|q: &Question| q.author == user.id));
        let question_upvotes: u64 = authored_questions
            .iter()
            .map(|q| q.upvote_count() as u64)
            .sum();
        let total_views: u64 = authored_questions.iter().map(|q| q.views).sum();
        let answer_upvotes: u64 = self
            .db
            .answers()
            .find(Query::new().filter(|a: &Answer| a.author == user.id))
            .iter()
            .map(|a| a.upvote_count() as u64)
            .sum();

        let criteria = [
            CriterionCount::new(BadgeCriterion::QuestionCount, total_questions as u64),
            CriterionCount::new(BadgeCriterion::AnswerCount, total_answers as u64),
            CriterionCount::new(BadgeCriterion::QuestionUpvotes, question_upvotes),
            CriterionCount::new(BadgeCriterion::AnswerUpvotes, answer_upvotes),
            CriterionCount::new(BadgeCriterion::TotalViews, total_views),
        ];
        let badges = assign_badges(&criteria, &self.badges);

        Ok(UserInfo {
            reputation: user.reputation,
            user,
            total_questions,
            total_answers,
            badges,
        })
    }

    /// Questions the user asked, newest first (views and upvotes break
    /// ties), resolved and paginated.
    pub fn get_user_questions(
        &self,
        params: GetUserStatsParams,
    ) -> ActionResult<Paged<QuestionView>> {
        let GetUserStatsParams {
            user_id,
            pagination,
        } = params;
        if !self.db.users().contains(user_id) {
            warn!(user = %user_id.short_id(), "user not found for questions");
            return Err(ActionError::UserNotFound);
        }

        let by_author = |q: &Question| q.author == user_id;
        let total = self.db.questions().count(by_author);
        let questions = self.db.questions().find(
            Query::new()
                .filter(by_author)
                .sort_by(|a: &Question, b: &Question| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then(b.views.cmp(&a.views))
                        .then(b.upvote_count().cmp(&a.upvote_count()))
                })
                .paginate(&pagination),
        );
        let items = views::resolve_questions(&self.db, &questions)?;
        Ok(Paged::new(items, total, &pagination))
    }

    /// Answers the user posted, newest first (upvotes break ties), resolved
    /// and paginated.
    pub fn get_user_answers(&self, params: GetUserStatsParams) -> ActionResult<Paged<AnswerView>> {
        let GetUserStatsParams {
            user_id,
            pagination,
        } = params;
        if !self.db.users().contains(user_id) {
            warn!(user = %user_id.short_id(), "user not found for answers");
            return Err(ActionError::UserNotFound);
        }

        let by_author = |a: &Answer| a.author == user_id;
        let total = self.db.answers().count(by_author);
        let answers = self.db.answers().find(
            Query::new()
                .filter(by_author)
                .sort_by(|a: &Answer, b: &Answer| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then(b.upvote_count().cmp(&a.upvote_count()))
                })
                .paginate(&pagination),
        );
        let items = answers
            .iter()
            .map(|a| views::resolve_answer(&self.db, a))
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Paged::new(items, total, &pagination))
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
