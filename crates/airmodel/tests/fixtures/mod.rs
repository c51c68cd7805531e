//! Shared models and sample data for airmodel integration tests.

#![allow(dead_code)]

use std::sync::LazyLock;

use airmodel::prelude::*;

// ==================== Users ====================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub active: bool,
    pub age: Option<i64>,
}

pub static USER_FIELDS: LazyLock<FieldMapping> = LazyLock::new(|| {
    FieldMapping::new()
        .field("name", "Name")
        .field("first_name", "First Name")
        .field("role", "Role")
        .define(FieldDef::new("active", "Active").boolean())
        .field("age", "Age")
        .field("email", "Email Address")
        .field("created_at", "Created")
        .define(FieldDef::new("full_name", "Full Name").readonly())
});

pub static USER_SCOPES: LazyLock<ScopeRegistry<User>> = LazyLock::new(|| {
    let scopes = ScopeRegistry::new();
    scopes
        .define("active", |r| Ok(r.filter(conditions! { "active" => true })))
        .expect("define active");
    scopes
        .define("admins", |r| Ok(r.filter(conditions! { "role" => "admin" })))
        .expect("define admins");
    scopes
        .define("adults", |r| Ok(r.filter(conditions! { "age" => 18..65 })))
        .expect("define adults");
    scopes
        .define_with_args("named", |r, args| match args.first() {
            Some(name) => Ok(r.filter(conditions! { "name" => name.clone() })),
            None => Ok(r.spawn()),
        })
        .expect("define named");
    scopes
        .define_formula("with_email", "NOT({Email Address} = BLANK())")
        .expect("define with_email");
    scopes
});

impl Model for User {
    const TABLE_NAME: &'static str = "Users";

    fn field_mapping() -> &'static FieldMapping {
        &USER_FIELDS
    }

    fn from_record(record: Record) -> Result<Self> {
        let fields = Self::field_mapping();
        Ok(User {
            id: record.id.clone().unwrap_or_default(),
            name: record.get_as(fields, "name")?,
            role: record.get_opt(fields, "role")?,
            active: record.get_as(fields, "active")?,
            age: record.get_opt(fields, "age")?,
        })
    }

    fn model_config() -> ModelConfig {
        ModelConfig::new()
            .base_key("appUsers123")
            .created_field("created_at")
    }
}

impl Scoped for User {
    fn scopes() -> &'static ScopeRegistry<Self> {
        &USER_SCOPES
    }
}

// ==================== Admins ====================

/// Second model over the same table, sharing the user field mapping but
/// carrying its own scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: String,
    pub name: String,
}

pub static ADMIN_SCOPES: LazyLock<ScopeRegistry<Admin>> = LazyLock::new(|| {
    let scopes = ScopeRegistry::new();
    scopes
        .define("superusers", |r| Ok(r.filter(conditions! { "role" => "root" })))
        .expect("define superusers");
    scopes
});

impl Model for Admin {
    const TABLE_NAME: &'static str = "Users";

    fn field_mapping() -> &'static FieldMapping {
        &USER_FIELDS
    }

    fn from_record(record: Record) -> Result<Self> {
        Ok(Admin {
            id: record.id.clone().unwrap_or_default(),
            name: record.get_as(Self::field_mapping(), "name")?,
        })
    }
}

impl Scoped for Admin {
    fn scopes() -> &'static ScopeRegistry<Self> {
        &ADMIN_SCOPES
    }
}

// ==================== Posts ====================

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub published: bool,
}

pub static POST_FIELDS: LazyLock<FieldMapping> = LazyLock::new(|| {
    FieldMapping::new()
        .field("title", "Title")
        .define(FieldDef::new("published", "Published?").boolean())
        .field("published_at", "Published At")
});

pub static POST_SCOPES: LazyLock<ScopeRegistry<Post>> = LazyLock::new(|| {
    let scopes = ScopeRegistry::new();
    scopes
        .define("published", |r| Ok(r.filter(conditions! { "published" => true })))
        .expect("define published");
    scopes
        .define("recent", |r| {
            Ok(r.order(("published_at", SortDirection::Desc)).limit(10))
        })
        .expect("define recent");
    scopes
});

impl Model for Post {
    const TABLE_NAME: &'static str = "Posts";

    fn field_mapping() -> &'static FieldMapping {
        &POST_FIELDS
    }

    fn from_record(record: Record) -> Result<Self> {
        let fields = Self::field_mapping();
        Ok(Post {
            id: record.id.clone().unwrap_or_default(),
            title: record.get_as(fields, "title")?,
            published: record.get_as(fields, "published")?,
        })
    }
}

impl Scoped for Post {
    fn scopes() -> &'static ScopeRegistry<Self> {
        &POST_SCOPES
    }
}

// ==================== Sample data ====================

pub fn user_record(id: &str, name: &str, role: &str, active: bool, age: i64) -> Record {
    Record::new(id)
        .with_field("Name", name)
        .with_field("Role", role)
        .with_field("Active", active)
        .with_field("Age", age)
}

pub fn sample_users() -> Vec<Record> {
    vec![
        user_record("rec001", "Ada", "admin", true, 36),
        user_record("rec002", "Grace", "admin", false, 45),
        user_record("rec003", "Linus", "member", true, 17),
        Record::new("rec004").with_field("Name", "Ken"),
    ]
}

pub fn sample_posts() -> Vec<Record> {
    vec![
        Record::new("recP1")
            .with_field("Title", "Hello")
            .with_field("Published?", true),
        Record::new("recP2").with_field("Title", "Draft"),
    ]
}

pub fn user_store() -> StubStore {
    StubStore::with_records(sample_users())
}
