//! Shared fixtures for ftsync-core integration tests.

use ftsync_core::{
    ColumnType, EntitySchema, FieldValue, Language, Searchable, SearchVectorValue,
    TsVectorDeclaration, Weight,
};

/// Blog article with two search vectors.
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub title: String,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub author_first: String,
    pub author_last: String,
    pub title_search: Option<SearchVectorValue>,
    pub body_search: Option<SearchVectorValue>,
}

impl Article {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn by(mut self, first: &str, last: &str) -> Self {
        self.author_first = first.to_string();
        self.author_last = last.to_string();
        self
    }

    fn author_name(&self) -> String {
        format!("{} {}", self.author_first, self.author_last)
    }
}

impl Searchable for Article {
    fn schema() -> EntitySchema {
        EntitySchema::builder("Article")
            .column("title", ColumnType::String, false)
            .column("body", ColumnType::Text, true)
            .column("tags", ColumnType::SimpleArray, false)
            .accessor("author_name")
            .search_vector(
                TsVectorDeclaration::builder("title_search")
                    .fields(["title", "tags"])
                    .name("title_fts")
                    .weight(Weight::A)
                    .build(),
            )
            .search_vector(
                TsVectorDeclaration::builder("body_search")
                    .fields(["body", "author_name"])
                    .language(Language::new("simple").expect("valid language"))
                    .build(),
            )
            .build()
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(self.title.as_str().into()),
            "body" => Some(self.body.clone().into()),
            "tags" => Some(self.tags.clone().into()),
            "author_name" => Some(self.author_name().into()),
            _ => None,
        }
    }

    fn set_search_vector(&mut self, property: &str, value: SearchVectorValue) {
        match property {
            "title_search" => self.title_search = Some(value),
            "body_search" => self.body_search = Some(value),
            _ => {}
        }
    }
}

/// Mapping file equivalent to [`Article::schema`] plus a broken entity.
pub const MAPPING_TOML: &str = r#"
[[entity]]
name = "Article"
table = "articles"

[[entity.field]]
name = "title"

[[entity.field]]
name = "body"
type = "text"
nullable = true

[[entity.field]]
name = "tags"
type = "simple_array"

[[entity.field]]
name = "author_name"
kind = "accessor"

[[entity.search_vector]]
property = "title_search"
name = "title_fts"
fields = ["title", "tags"]
weight = "A"

[[entity.search_vector]]
property = "body_search"
fields = ["body", "author_name"]
language = "simple"

[[entity]]
name = "Invoice"

[[entity.field]]
name = "total"
type = "decimal"

[[entity.search_vector]]
property = "search"
fields = ["total"]
"#;
