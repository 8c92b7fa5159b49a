use crate::db::{Insert, MemoryStore, Record, Table};
use crate::schema::{self, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Program,
    Story,
    BlogPost,
    Staff,
    Newsletter,
    ContactMessage,
}

impl EntityKind {
    /// Human-readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Program => "Program",
            EntityKind::Story => "Story",
            EntityKind::BlogPost => "Blog post",
            EntityKind::Staff => "Staff member",
            EntityKind::Newsletter => "Subscription",
            EntityKind::ContactMessage => "Contact message",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Program => "program",
            EntityKind::Story => "story",
            EntityKind::BlogPost => "blog_post",
            EntityKind::Staff => "staff",
            EntityKind::Newsletter => "newsletter",
            EntityKind::ContactMessage => "contact_message",
        };
        write!(f, "{}", s)
    }
}

/// Generate a new record ID (21 URL-safe characters, ~126 random bits)
pub fn generate_id() -> String {
    nanoid::nanoid!()
}

/// A program the organization runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgram {
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

/// Testimonial shown on the public site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub name: String,
    pub role: String,
    pub quote: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStory {
    pub name: String,
    pub role: String,
    pub quote: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub category: String,
    pub read_time: u32,
    pub published_at: DateTime<Utc>,
}

/// Blog post insert shape. `published_at` falls back to creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub category: String,
    pub read_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscription {
    pub id: String,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Record for Program {
    const KIND: EntityKind = EntityKind::Program;

    fn id(&self) -> &str {
        &self.id
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.programs()
    }
}

impl Insert for NewProgram {
    type Record = Program;
    const SCHEMA: &'static Schema = &schema::PROGRAM;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> Program {
        self.with_id(id)
    }

    fn replace(self, existing: &Program) -> Program {
        self.with_id(existing.id.clone())
    }
}

impl NewProgram {
    /// Program records carry no server timestamps
    fn with_id(self, id: String) -> Program {
        Program {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            category: self.category,
        }
    }
}

impl Record for Story {
    const KIND: EntityKind = EntityKind::Story;

    fn id(&self) -> &str {
        &self.id
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.stories()
    }
}

impl Insert for NewStory {
    type Record = Story;
    const SCHEMA: &'static Schema = &schema::STORY;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> Story {
        self.with_id(id)
    }

    fn replace(self, existing: &Story) -> Story {
        self.with_id(existing.id.clone())
    }
}

impl NewStory {
    fn with_id(self, id: String) -> Story {
        Story {
            id,
            name: self.name,
            role: self.role,
            quote: self.quote,
            image: self.image,
        }
    }
}

impl Record for BlogPost {
    const KIND: EntityKind = EntityKind::BlogPost;

    fn id(&self) -> &str {
        &self.id
    }

    fn listed_at(&self) -> Option<DateTime<Utc>> {
        Some(self.published_at)
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.blog_posts()
    }
}

impl Insert for NewBlogPost {
    type Record = BlogPost;
    const SCHEMA: &'static Schema = &schema::BLOG_POST;

    fn into_record(self, id: String, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            image: self.image,
            category: self.category,
            read_time: self.read_time,
            published_at: self.published_at.unwrap_or(now),
        }
    }

    fn replace(self, existing: &BlogPost) -> BlogPost {
        self.into_record(existing.id.clone(), existing.published_at)
    }
}

impl Record for Staff {
    const KIND: EntityKind = EntityKind::Staff;

    fn id(&self) -> &str {
        &self.id
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.staff()
    }
}

impl Insert for NewStaff {
    type Record = Staff;
    const SCHEMA: &'static Schema = &schema::STAFF;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> Staff {
        self.with_id(id)
    }

    fn replace(self, existing: &Staff) -> Staff {
        self.with_id(existing.id.clone())
    }
}

impl NewStaff {
    fn with_id(self, id: String) -> Staff {
        Staff {
            id,
            name: self.name,
            role: self.role,
            bio: self.bio,
            image: self.image,
            email: self.email,
            linkedin: self.linkedin,
            twitter: self.twitter,
        }
    }
}

impl Record for NewsletterSubscription {
    const KIND: EntityKind = EntityKind::Newsletter;
    const DUPLICATE_MESSAGE: &'static str = "Email already subscribed";

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.subscriptions()
    }
}

impl Insert for NewSubscription {
    type Record = NewsletterSubscription;
    const SCHEMA: &'static Schema = &schema::NEWSLETTER;

    fn into_record(self, id: String, now: DateTime<Utc>) -> NewsletterSubscription {
        NewsletterSubscription {
            id,
            email: self.email,
            subscribed_at: now,
        }
    }

    fn replace(self, existing: &NewsletterSubscription) -> NewsletterSubscription {
        self.into_record(existing.id.clone(), existing.subscribed_at)
    }
}

impl Record for ContactMessage {
    const KIND: EntityKind = EntityKind::ContactMessage;

    fn id(&self) -> &str {
        &self.id
    }

    fn listed_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn table(store: &MemoryStore) -> &Table<Self> {
        store.contact_messages()
    }
}

impl Insert for NewContactMessage {
    type Record = ContactMessage;
    const SCHEMA: &'static Schema = &schema::CONTACT_MESSAGE;

    fn into_record(self, id: String, now: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            created_at: now,
        }
    }

    fn replace(self, existing: &ContactMessage) -> ContactMessage {
        self.into_record(existing.id.clone(), existing.created_at)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    /// Comma-separated admin API keys. Empty disables admin auth.
    #[serde(default)]
    pub admin_keys: String,
}

impl ServerConfig {
    pub fn parsed_admin_keys(&self) -> Vec<String> {
        self.admin_keys
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            admin_keys: String::new(),
        }
    }
}

/// Newsletter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterConfig {
    /// Compare subscription emails exactly (true) or case-folded (false)
    pub case_sensitive: bool,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub newsletter: NewsletterConfig,
    /// Load the sample programs, stories and blog posts at startup
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_seed() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            newsletter: NewsletterConfig::default(),
            seed: true,
        }
    }
}
