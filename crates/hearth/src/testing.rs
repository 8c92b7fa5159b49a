//! Test utilities for the hearth crate
//!
//! Deterministic clocks, prebuilt stores and JSON request fixtures shared by
//! unit tests, integration tests and the server crate.

use crate::db::{Clock, MemoryStore};
use crate::services::{NewsletterConfig, SiteService};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock starting at 2024-01-01T00:00:00Z that advances one second per call
pub fn stepping_clock() -> Clock {
    let start = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_704_067_200);
    let tick = AtomicI64::new(0);
    Arc::new(move || start + Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
}

/// Empty store on a stepping clock
pub fn test_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_clock(
        NewsletterConfig::default(),
        stepping_clock(),
    ))
}

/// Service over an empty store on a stepping clock
pub fn test_service() -> SiteService {
    SiteService::new(test_store())
}

pub fn subscription_input(email: &str) -> Value {
    json!({ "email": email })
}

pub fn contact_input(name: &str, email: &str, subject: &str, message: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "subject": subject,
        "message": message
    })
}

pub fn program_input(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Weekly tutoring and school supplies.",
        "image": "https://images.example.org/programs/tutoring.jpg",
        "category": "Education"
    })
}

pub fn story_input(name: &str) -> Value {
    json!({
        "name": name,
        "role": "Volunteer",
        "quote": "Helping out changed how I see my town.",
        "image": "/uploads/stories/volunteer.jpg"
    })
}

/// Blog post input; `published_at` is omitted when `None`
pub fn blog_post_input(title: &str, published_at: Option<&str>) -> Value {
    let mut input = json!({
        "title": title,
        "excerpt": "A short summary.",
        "content": "The full body of the post.",
        "image": "/uploads/blog/cover.jpg",
        "category": "News",
        "readTime": 4
    });
    if let Some(published_at) = published_at {
        input["publishedAt"] = json!(published_at);
    }
    input
}

pub fn staff_input(name: &str) -> Value {
    json!({
        "name": name,
        "role": "Program Coordinator",
        "bio": "Coordinates field programs across the region.",
        "image": "/uploads/staff/portrait.jpg",
        "email": "coordinator@example.org",
        "linkedin": "https://www.linkedin.com/in/coordinator"
    })
}
