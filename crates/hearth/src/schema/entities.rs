use super::{Field, Rule, Schema};
use crate::services::EntityKind;

pub const PROGRAM: Schema = Schema {
    kind: EntityKind::Program,
    fields: &[
        Field::text("title"),
        Field::text("description"),
        Field::text("image").with(&[Rule::Url]),
        Field::text("category"),
    ],
};

pub const STORY: Schema = Schema {
    kind: EntityKind::Story,
    fields: &[
        Field::text("name"),
        Field::text("role"),
        Field::text("quote"),
        Field::text("image").with(&[Rule::Url]),
    ],
};

pub const BLOG_POST: Schema = Schema {
    kind: EntityKind::BlogPost,
    fields: &[
        Field::text("title"),
        Field::text("excerpt"),
        Field::text("content"),
        Field::text("image").with(&[Rule::Url]),
        Field::text("category"),
        Field::integer("readTime").with(&[Rule::Positive]),
        Field::timestamp("publishedAt").optional(),
    ],
};

pub const STAFF: Schema = Schema {
    kind: EntityKind::Staff,
    fields: &[
        Field::text("name"),
        Field::text("role"),
        Field::text("bio"),
        Field::text("image").with(&[Rule::Url]),
        Field::text("email").optional().with(&[Rule::Email]),
        Field::text("linkedin").optional().with(&[Rule::Url]),
        Field::text("twitter").optional().with(&[Rule::Url]),
    ],
};

pub const NEWSLETTER: Schema = Schema {
    kind: EntityKind::Newsletter,
    fields: &[Field::text("email").with(&[Rule::Email])],
};

pub const CONTACT_MESSAGE: Schema = Schema {
    kind: EntityKind::ContactMessage,
    fields: &[
        Field::text("name").with(&[Rule::MinLength(2)]),
        Field::text("email").with(&[Rule::Email]),
        Field::text("subject").with(&[Rule::MinLength(3)]),
        Field::text("message").with(&[Rule::MinLength(10)]),
    ],
};
