/**
 * In-Memory Store
 *
 * Implements every repository trait over plain vectors guarded by one
 * `tokio::sync::RwLock`. Records are kept in insertion order, so iterating
 * in reverse yields newest first.
 *
 * Used when no `DATABASE_URL` is configured and by the test suite.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, ProfileChanges, UserFilter, UserRecord, UserRepository};
use crate::backend::comments::db::{CommentRecord, CommentRepository, NewComment};
use crate::backend::events::db::{EventChanges, EventRecord, EventRepository, NewEvent};
use crate::backend::groups::db::{GroupChanges, GroupRecord, GroupRepository, NewGroup};
use crate::backend::polls::db::{NewPoll, PollChanges, PollOption, PollRecord, PollRepository};
use crate::backend::posts::db::{NewPost, PostChanges, PostFilter, PostRecord, PostRepository};
use crate::backend::resources::db::{
    NewResource, ResourceChanges, ResourceFilter, ResourceRecord, ResourceRepository,
};
use crate::backend::store::{StoreError, StoreResult};
use crate::shared::models::UserSummary;
use crate::shared::pagination::PageRequest;

#[derive(Default)]
struct Collections {
    users: Vec<UserRecord>,
    posts: Vec<PostRecord>,
    comments: Vec<CommentRecord>,
    events: Vec<EventRecord>,
    polls: Vec<PollRecord>,
    resources: Vec<ResourceRecord>,
    groups: Vec<GroupRecord>,
}

impl Collections {
    fn post_with_comments(&self, post: &PostRecord) -> PostRecord {
        let mut post = post.clone();
        post.comments = self
            .comments
            .iter()
            .filter(|comment| comment.post_id == post.id)
            .map(|comment| comment.id)
            .collect();
        post
    }

    fn remove_post(&mut self, id: Uuid) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.comments.retain(|comment| comment.post_id != id);
        self.posts.len() != before
    }
}

/// Slice one page out of an already ordered list
fn page_of<T: Clone>(items: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    (items.into_iter().skip(skip).take(limit).collect(), total)
}

/// Remove `user_id` from `members` if present, else add it
fn toggle(members: &mut Vec<Uuid>, user_id: Uuid) -> bool {
    if members.contains(&user_id) {
        members.retain(|member| *member != user_id);
        false
    } else {
        members.push(user_id);
        true
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut data = self.inner.write().await;
        if data.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }
        if data.users.iter().any(|existing| existing.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            fullname: user.fullname,
            password_hash: user.password_hash,
            bio: user.bio,
            avatar: user.avatar,
            cover_image: user.cover_image,
            department: user.department,
            role: user.role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        data.users.push(record.clone());
        Ok(record)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|user| user.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|user| user.email == email).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|user| user.username == username).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().rev().cloned().collect())
    }

    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .iter()
            .rev()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<UserRecord>> {
        let mut data = self.inner.write().await;
        let Some(user) = data.users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(fullname) = changes.fullname {
            user.fullname = fullname;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(department) = changes.department {
            user.department = Some(department);
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = avatar;
        }
        if let Some(cover_image) = changes.cover_image {
            user.cover_image = Some(cover_image);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        if let Some(user) = data.users.iter_mut().find(|user| user.id == id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        if let Some(user) = data.users.iter_mut().find(|user| user.id == id) {
            user.refresh_token = token.map(str::to_string);
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.users.len();
        data.users.retain(|user| user.id != id);
        if data.users.len() == before {
            return Ok(false);
        }

        let owned_posts: Vec<Uuid> = data
            .posts
            .iter()
            .filter(|post| post.owner_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in owned_posts {
            data.remove_post(post_id);
        }
        data.comments.retain(|comment| comment.owner_id != id);
        data.events.retain(|event| event.owner_id != id);
        data.polls.retain(|poll| poll.created_by != id);
        data.resources.retain(|resource| resource.uploaded_by != id);
        data.groups.retain(|group| group.admin_id != id);

        for post in &mut data.posts {
            post.likes.retain(|user| *user != id);
        }
        for event in &mut data.events {
            event.attendees.retain(|user| *user != id);
        }
        for poll in &mut data.polls {
            for option in &mut poll.options {
                option.votes.retain(|user| *user != id);
            }
        }
        for group in &mut data.groups {
            group.members.retain(|user| *user != id);
        }
        Ok(true)
    }

    async fn user_summaries(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, UserSummary>> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .map(|user| (user.id, user.summary()))
            .collect())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let now = Utc::now();
        let record = PostRecord {
            id: Uuid::new_v4(),
            owner_id: post.owner_id,
            title: post.title,
            content: post.content,
            media: post.media,
            tags: post.tags,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.posts.push(record.clone());
        Ok(record)
    }

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let data = self.inner.read().await;
        Ok(data
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| data.post_with_comments(post)))
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)> {
        let data = self.inner.read().await;
        let matching: Vec<PostRecord> = data
            .posts
            .iter()
            .rev()
            .filter(|post| filter.matches(post))
            .map(|post| data.post_with_comments(post))
            .collect();
        Ok(page_of(matching, page))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> StoreResult<Option<PostRecord>> {
        let mut data = self.inner.write().await;
        let Some(post) = data.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = Some(title);
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(media) = changes.media {
            post.media = Some(media);
        }
        if let Some(tags) = changes.tags {
            post.tags = tags;
        }
        post.updated_at = Utc::now();
        let post = post.clone();
        Ok(Some(data.post_with_comments(&post)))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.inner.write().await.remove_post(id))
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<(bool, usize)>> {
        let mut data = self.inner.write().await;
        Ok(data.posts.iter_mut().find(|post| post.id == post_id).map(|post| {
            let liked = toggle(&mut post.likes, user_id);
            (liked, post.likes.len())
        }))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<CommentRecord> {
        let now = Utc::now();
        let record = CommentRecord {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            owner_id: comment.owner_id,
            text: comment.text,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.comments.push(record.clone());
        Ok(record)
    }

    async fn comment_by_id(&self, id: Uuid) -> StoreResult<Option<CommentRecord>> {
        let data = self.inner.read().await;
        Ok(data.comments.iter().find(|comment| comment.id == id).cloned())
    }

    async fn comments_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        let data = self.inner.read().await;
        let matching: Vec<CommentRecord> = data
            .comments
            .iter()
            .rev()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }

    async fn update_comment(&self, id: Uuid, text: &str) -> StoreResult<Option<CommentRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.comments.iter_mut().find(|comment| comment.id == id).map(|comment| {
            comment.text = text.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.comments.len();
        data.comments.retain(|comment| comment.id != id);
        Ok(data.comments.len() != before)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord> {
        let now = Utc::now();
        let record = EventRecord {
            id: Uuid::new_v4(),
            owner_id: event.owner_id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            attendees: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.events.push(record.clone());
        Ok(record)
    }

    async fn event_by_id(&self, id: Uuid) -> StoreResult<Option<EventRecord>> {
        let data = self.inner.read().await;
        Ok(data.events.iter().find(|event| event.id == id).cloned())
    }

    async fn list_events(&self, page: PageRequest) -> StoreResult<(Vec<EventRecord>, u64)> {
        let mut events = self.inner.read().await.events.clone();
        events.sort_by_key(|event| event.date);
        Ok(page_of(events, page))
    }

    async fn upcoming_events(&self, now: DateTime<Utc>, limit: u64) -> StoreResult<Vec<EventRecord>> {
        let mut events: Vec<EventRecord> = self
            .inner
            .read()
            .await
            .events
            .iter()
            .filter(|event| event.date >= now)
            .cloned()
            .collect();
        events.sort_by_key(|event| event.date);
        events.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(events)
    }

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
    ) -> StoreResult<Option<EventRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.events.iter_mut().find(|event| event.id == id).map(|event| {
            if let Some(title) = changes.title {
                event.title = title;
            }
            if let Some(description) = changes.description {
                event.description = Some(description);
            }
            if let Some(date) = changes.date {
                event.date = date;
            }
            if let Some(location) = changes.location {
                event.location = Some(location);
            }
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.events.len();
        data.events.retain(|event| event.id != id);
        Ok(data.events.len() != before)
    }

    async fn toggle_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>> {
        let mut data = self.inner.write().await;
        Ok(data.events.iter_mut().find(|event| event.id == event_id).map(|event| {
            let attending = toggle(&mut event.attendees, user_id);
            (attending, event.attendees.len())
        }))
    }
}

#[async_trait]
impl PollRepository for MemoryStore {
    async fn create_poll(&self, poll: NewPoll) -> StoreResult<PollRecord> {
        let now = Utc::now();
        let record = PollRecord {
            id: Uuid::new_v4(),
            created_by: poll.created_by,
            question: poll.question,
            options: poll.options.into_iter().map(PollOption::new).collect(),
            expires_at: poll.expires_at,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.polls.push(record.clone());
        Ok(record)
    }

    async fn poll_by_id(&self, id: Uuid) -> StoreResult<Option<PollRecord>> {
        let data = self.inner.read().await;
        Ok(data.polls.iter().find(|poll| poll.id == id).cloned())
    }

    async fn list_polls(&self, page: PageRequest) -> StoreResult<(Vec<PollRecord>, u64)> {
        let polls: Vec<PollRecord> = self.inner.read().await.polls.iter().rev().cloned().collect();
        Ok(page_of(polls, page))
    }

    async fn active_polls(&self, now: DateTime<Utc>) -> StoreResult<Vec<PollRecord>> {
        let data = self.inner.read().await;
        Ok(data
            .polls
            .iter()
            .rev()
            .filter(|poll| !poll.is_expired(now))
            .cloned()
            .collect())
    }

    async fn update_poll(&self, id: Uuid, changes: PollChanges) -> StoreResult<Option<PollRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.polls.iter_mut().find(|poll| poll.id == id).map(|poll| {
            if let Some(question) = changes.question {
                poll.question = question;
            }
            if let Some(options) = changes.options {
                poll.options = options.into_iter().map(PollOption::new).collect();
            }
            if let Some(expires_at) = changes.expires_at {
                poll.expires_at = expires_at;
            }
            poll.updated_at = Utc::now();
            poll.clone()
        }))
    }

    async fn delete_poll(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.polls.len();
        data.polls.retain(|poll| poll.id != id);
        Ok(data.polls.len() != before)
    }

    async fn record_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: usize,
    ) -> StoreResult<Option<PollRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.polls.iter_mut().find(|poll| poll.id == poll_id).map(|poll| {
            poll.apply_vote(user_id, option_index);
            poll.clone()
        }))
    }
}

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn create_resource(&self, resource: NewResource) -> StoreResult<ResourceRecord> {
        let now = Utc::now();
        let record = ResourceRecord {
            id: Uuid::new_v4(),
            uploaded_by: resource.uploaded_by,
            title: resource.title,
            description: resource.description,
            file_url: resource.file_url,
            course_id: resource.course_id,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.resources.push(record.clone());
        Ok(record)
    }

    async fn resource_by_id(&self, id: Uuid) -> StoreResult<Option<ResourceRecord>> {
        let data = self.inner.read().await;
        Ok(data.resources.iter().find(|resource| resource.id == id).cloned())
    }

    async fn list_resources(
        &self,
        filter: &ResourceFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ResourceRecord>, u64)> {
        let data = self.inner.read().await;
        let matching: Vec<ResourceRecord> = data
            .resources
            .iter()
            .rev()
            .filter(|resource| filter.matches(resource))
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }

    async fn update_resource(
        &self,
        id: Uuid,
        changes: ResourceChanges,
    ) -> StoreResult<Option<ResourceRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.resources.iter_mut().find(|resource| resource.id == id).map(|resource| {
            if let Some(title) = changes.title {
                resource.title = title;
            }
            if let Some(description) = changes.description {
                resource.description = Some(description);
            }
            if let Some(file_url) = changes.file_url {
                resource.file_url = file_url;
            }
            if let Some(course_id) = changes.course_id {
                resource.course_id = Some(course_id);
            }
            resource.updated_at = Utc::now();
            resource.clone()
        }))
    }

    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.resources.len();
        data.resources.retain(|resource| resource.id != id);
        Ok(data.resources.len() != before)
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create_group(&self, group: NewGroup) -> StoreResult<GroupRecord> {
        let now = Utc::now();
        let record = GroupRecord {
            id: Uuid::new_v4(),
            name: group.name,
            description: group.description,
            admin_id: group.admin_id,
            members: vec![group.admin_id],
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.groups.push(record.clone());
        Ok(record)
    }

    async fn group_by_id(&self, id: Uuid) -> StoreResult<Option<GroupRecord>> {
        let data = self.inner.read().await;
        Ok(data.groups.iter().find(|group| group.id == id).cloned())
    }

    async fn list_groups(&self, page: PageRequest) -> StoreResult<(Vec<GroupRecord>, u64)> {
        let groups: Vec<GroupRecord> = self.inner.read().await.groups.iter().rev().cloned().collect();
        Ok(page_of(groups, page))
    }

    async fn update_group(
        &self,
        id: Uuid,
        changes: GroupChanges,
    ) -> StoreResult<Option<GroupRecord>> {
        let mut data = self.inner.write().await;
        Ok(data.groups.iter_mut().find(|group| group.id == id).map(|group| {
            if let Some(name) = changes.name {
                group.name = name;
            }
            if let Some(description) = changes.description {
                group.description = Some(description);
            }
            group.updated_at = Utc::now();
            group.clone()
        }))
    }

    async fn delete_group(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.groups.len();
        data.groups.retain(|group| group.id != id);
        Ok(data.groups.len() != before)
    }

    async fn toggle_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>> {
        let mut data = self.inner.write().await;
        Ok(data.groups.iter_mut().find(|group| group.id == group_id).map(|group| {
            let member = toggle(&mut group.members, user_id);
            (member, group.members.len())
        }))
    }
}
