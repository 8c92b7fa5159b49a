//! Process-lifetime record store.
//!
//! One [`Table`] per entity kind, each behind its own `RwLock`. Unique-key
//! checks run under the same write guard as the insert or replace they
//! protect, so concurrent duplicates cannot both land.

use super::{seed, Insert, Record, StoreError};
use crate::services::types::{
    generate_id, BlogPost, ContactMessage, NewsletterConfig, NewsletterSubscription, Program,
    Staff, Story,
};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Source of server-assigned timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Records of a single kind, in insertion order
pub struct Table<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<R>>, StoreError> {
        self.rows.read().map_err(|_| StoreError::Poisoned(R::KIND))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<R>>, StoreError> {
        self.rows.write().map_err(|_| StoreError::Poisoned(R::KIND))
    }

    fn duplicate() -> StoreError {
        StoreError::Duplicate {
            kind: R::KIND,
            message: R::DUPLICATE_MESSAGE,
        }
    }

    /// Append `record` unless another row shares its unique key
    pub fn insert(
        &self,
        record: R,
        same_key: impl Fn(&str, &str) -> bool,
    ) -> Result<R, StoreError> {
        let mut rows = self.write()?;

        if let Some(key) = record.unique_key() {
            let taken = rows
                .iter()
                .filter_map(|r| r.unique_key())
                .any(|existing| same_key(existing, key));
            if taken {
                return Err(Self::duplicate());
            }
        }

        rows.push(record.clone());
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    pub fn find(&self, predicate: impl Fn(&R) -> bool) -> Result<Option<R>, StoreError> {
        Ok(self.read()?.iter().find(|r| predicate(r)).cloned())
    }

    /// All rows, newest first for timestamped kinds
    pub fn list(&self) -> Result<Vec<R>, StoreError> {
        let mut rows = self.read()?.clone();

        if rows.iter().any(|r| r.listed_at().is_some()) {
            // Reversed first so equal timestamps keep the latest insert on top
            rows.reverse();
            rows.sort_by_key(|r| Reverse(r.listed_at()));
        }

        Ok(rows)
    }

    /// Swap the row with `id` for `build(existing)`. `None` when absent.
    ///
    /// `build` runs under the write guard, so concurrent replacements of one
    /// row each see the previous one's result.
    pub fn replace<E: From<StoreError>>(
        &self,
        id: &str,
        build: impl FnOnce(&R) -> Result<R, E>,
        same_key: impl Fn(&str, &str) -> bool,
    ) -> Result<Option<R>, E> {
        let mut rows = self.write()?;

        let Some(index) = rows.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let updated = build(&rows[index])?;

        if let Some(key) = updated.unique_key() {
            let taken = rows
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .filter_map(|(_, r)| r.unique_key())
                .any(|existing| same_key(existing, key));
            if taken {
                return Err(Self::duplicate().into());
            }
        }

        rows[index] = updated.clone();
        Ok(Some(updated))
    }

    pub fn remove(&self, id: &str) -> Result<Option<R>, StoreError> {
        let mut rows = self.write()?;
        let Some(index) = rows.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        Ok(Some(rows.remove(index)))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store for every entity kind
pub struct MemoryStore {
    programs: Table<Program>,
    stories: Table<Story>,
    blog_posts: Table<BlogPost>,
    staff: Table<Staff>,
    subscriptions: Table<NewsletterSubscription>,
    contact_messages: Table<ContactMessage>,
    newsletter: NewsletterConfig,
    clock: Clock,
}

impl MemoryStore {
    /// Create an empty store using the system clock
    pub fn new(newsletter: NewsletterConfig) -> Self {
        Self::with_clock(newsletter, Arc::new(Utc::now))
    }

    /// Create an empty store with a custom timestamp source
    pub fn with_clock(newsletter: NewsletterConfig, clock: Clock) -> Self {
        Self {
            programs: Table::new(),
            stories: Table::new(),
            blog_posts: Table::new(),
            staff: Table::new(),
            subscriptions: Table::new(),
            contact_messages: Table::new(),
            newsletter,
            clock,
        }
    }

    /// Create a store holding the sample programs, stories and blog posts
    pub fn seeded(newsletter: NewsletterConfig) -> Result<Self, StoreError> {
        let store = Self::new(newsletter);
        seed::apply(&store)?;
        Ok(store)
    }

    pub fn programs(&self) -> &Table<Program> {
        &self.programs
    }

    pub fn stories(&self) -> &Table<Story> {
        &self.stories
    }

    pub fn blog_posts(&self) -> &Table<BlogPost> {
        &self.blog_posts
    }

    pub fn staff(&self) -> &Table<Staff> {
        &self.staff
    }

    pub fn subscriptions(&self) -> &Table<NewsletterSubscription> {
        &self.subscriptions
    }

    pub fn contact_messages(&self) -> &Table<ContactMessage> {
        &self.contact_messages
    }

    fn keys_match(&self, a: &str, b: &str) -> bool {
        if self.newsletter.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    /// Store a new record with a fresh ID and server timestamps
    pub fn create<I: Insert>(&self, input: I) -> Result<I::Record, StoreError> {
        let record = input.into_record(generate_id(), (self.clock)());
        <I::Record as Record>::table(self).insert(record, |a, b| self.keys_match(a, b))
    }

    pub fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        R::table(self).list()
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        R::table(self).get(id)
    }

    /// Replace the fields of an existing record. `None` when `id` is unknown.
    pub fn update<I: Insert>(&self, id: &str, input: I) -> Result<Option<I::Record>, StoreError> {
        self.patch(id, |_: &I::Record| Ok::<I, StoreError>(input))
    }

    /// Derive new fields from the current record and replace it in one step.
    /// An error from `derive` leaves the record untouched.
    pub fn patch<I, E>(
        &self,
        id: &str,
        derive: impl FnOnce(&I::Record) -> Result<I, E>,
    ) -> Result<Option<I::Record>, E>
    where
        I: Insert,
        E: From<StoreError>,
    {
        <I::Record as Record>::table(self).replace::<E>(
            id,
            |existing| Ok(derive(existing)?.replace(existing)),
            |a, b| self.keys_match(a, b),
        )
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        Ok(R::table(self).remove(id)?.is_some())
    }

    pub fn len<R: Record>(&self) -> Result<usize, StoreError> {
        R::table(self).len()
    }

    /// Look up a subscription using the same matching as the uniqueness check
    pub fn subscription_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, StoreError> {
        let email = email.trim();
        self.subscriptions.find(|s| self.keys_match(&s.email, email))
    }
}
