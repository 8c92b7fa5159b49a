//! Sample content loaded once when a store is built with
//! [`MemoryStore::seeded`](super::MemoryStore::seeded).

use super::{MemoryStore, StoreError};
use crate::services::types::{NewBlogPost, NewProgram, NewStory};
use chrono::{TimeZone, Utc};

pub fn programs() -> Vec<NewProgram> {
    [
        (
            "Education for Every Child",
            "After-school tutoring, school supplies and scholarships for children in underserved communities.",
            "https://images.unsplash.com/photo-1497486751825-1233686d5d80",
            "Education",
        ),
        (
            "Clean Water Initiative",
            "Building wells and filtration systems so families have safe drinking water close to home.",
            "https://images.unsplash.com/photo-1541544741938-0af808871cc0",
            "Health",
        ),
        (
            "Women's Livelihood Program",
            "Vocational training, micro-loans and mentoring that help women start and grow small businesses.",
            "https://images.unsplash.com/photo-1529390079861-591de354faf5",
            "Empowerment",
        ),
        (
            "Community Health Camps",
            "Free check-ups, vaccinations and health education delivered by volunteer doctors and nurses.",
            "https://images.unsplash.com/photo-1576091160550-2173dba999ef",
            "Health",
        ),
    ]
    .into_iter()
    .map(|(title, description, image, category)| NewProgram {
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        category: category.to_string(),
    })
    .collect()
}

pub fn stories() -> Vec<NewStory> {
    [
        (
            "Priya Sharma",
            "Scholarship recipient",
            "The scholarship let me finish school. I am now the first engineer in my family.",
            "https://images.unsplash.com/photo-1494790108377-be9c29b29330",
        ),
        (
            "Rahul Verma",
            "Volunteer teacher",
            "Teaching on weekends has given me more than I could ever give back.",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d",
        ),
        (
            "Meena Devi",
            "Small business owner",
            "With a small loan and training I opened my tailoring shop and now employ three women.",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80",
        ),
    ]
    .into_iter()
    .map(|(name, role, quote, image)| NewStory {
        name: name.to_string(),
        role: role.to_string(),
        quote: quote.to_string(),
        image: image.to_string(),
    })
    .collect()
}

pub fn blog_posts() -> Vec<NewBlogPost> {
    [
        (
            "How Clean Water Changed a Village",
            "One year after the new well opened, school attendance in Rampur has doubled.",
            "When the nearest safe water source was a two hour walk away, girls in Rampur spent their mornings carrying water instead of attending class. The well built last spring changed that.",
            "https://images.unsplash.com/photo-1470116945706-e6bf5d5a53ca",
            "Impact",
            4,
            (2024, 3, 15),
        ),
        (
            "Volunteering 101: Getting Started",
            "Everything you need to know before your first day volunteering with us.",
            "Volunteers are the backbone of our programs. This guide walks through registration, orientation and what to expect during your first week in the field.",
            "https://images.unsplash.com/photo-1559027615-cd4628902d4a",
            "Guides",
            6,
            (2024, 2, 28),
        ),
        (
            "Our Year in Review",
            "A look back at the milestones our community reached together last year.",
            "Thanks to our donors and volunteers we reached more families than ever before. Here are the numbers and the people behind them.",
            "https://images.unsplash.com/photo-1488521787991-ed7bbaae773c",
            "News",
            5,
            (2024, 1, 10),
        ),
    ]
    .into_iter()
    .map(
        |(title, excerpt, content, image, category, read_time, (year, month, day))| NewBlogPost {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            content: content.to_string(),
            image: image.to_string(),
            category: category.to_string(),
            read_time,
            published_at: Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single(),
        },
    )
    .collect()
}

/// Insert the sample set into `store`
pub fn apply(store: &MemoryStore) -> Result<(), StoreError> {
    let programs = programs();
    let stories = stories();
    let posts = blog_posts();
    let counts = (programs.len(), stories.len(), posts.len());

    for program in programs {
        store.create(program)?;
    }
    for story in stories {
        store.create(story)?;
    }
    for post in posts {
        store.create(post)?;
    }

    tracing::info!(
        programs = counts.0,
        stories = counts.1,
        blog_posts = counts.2,
        "Seeded sample content"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::types::{BlogPost, NewsletterConfig, Program, Story};

    #[test]
    fn seeded_store_holds_exactly_the_sample_set() {
        let store = MemoryStore::seeded(NewsletterConfig::default()).unwrap();

        let programs: Vec<String> = store
            .list::<Program>()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        let expected: Vec<String> = super::programs().into_iter().map(|p| p.title).collect();
        assert_eq!(programs, expected);

        assert_eq!(store.len::<Story>().unwrap(), 3);
        assert_eq!(store.len::<BlogPost>().unwrap(), 3);
    }

    #[test]
    fn seeded_blog_posts_list_newest_first() {
        let store = MemoryStore::seeded(NewsletterConfig::default()).unwrap();
        let posts = store.list::<BlogPost>().unwrap();
        assert!(posts
            .windows(2)
            .all(|pair| pair[0].published_at > pair[1].published_at));
        assert_eq!(posts[0].title, "How Clean Water Changed a Village");
    }

    #[test]
    fn seed_records_pass_validation() {
        use crate::db::Insert;
        use crate::schema::validate;

        for program in programs() {
            let json = serde_json::to_value(&program).unwrap();
            assert!(validate(NewProgram::SCHEMA, &json).is_ok());
        }
        for story in stories() {
            let json = serde_json::to_value(&story).unwrap();
            assert!(validate(NewStory::SCHEMA, &json).is_ok());
        }
        for post in blog_posts() {
            assert!(post.published_at.is_some());
            let json = serde_json::to_value(&post).unwrap();
            assert!(validate(NewBlogPost::SCHEMA, &json).is_ok());
        }
    }

    #[test]
    fn fresh_store_is_empty() {
        let store = MemoryStore::new(NewsletterConfig::default());
        assert_eq!(store.len::<Program>().unwrap(), 0);
    }
}
