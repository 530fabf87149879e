//! SeaORM entities for database tables

/// Company pages table
pub mod company_page {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "company_pages")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Unique URL slug
        #[sea_orm(unique)]
        pub slug: String,

        pub category_id: String,
        pub sub_category_id: Option<String>,
        pub name: String,
        pub logo: Option<String>,
        pub description: Option<String>,
        pub rating: f64,
        pub total_reviews: i64,
        pub founded: Option<String>,
        pub headquarters: Option<String>,
        pub website: Option<String>,
        pub parent_company: Option<String>,

        /// Tab references, one column per tab kind
        pub tab_numbers: Option<Uuid>,
        pub tab_complaints: Option<Uuid>,
        pub tab_quickhelp: Option<Uuid>,
        pub tab_video: Option<Uuid>,
        pub tab_overview: Option<Uuid>,

        /// Ordered tab names as a JSON array
        pub selected_tabs: Json,

        /// Admin-authored blocks as a JSON array
        pub dynamic_components: Json,

        /// Optimistic concurrency counter
        pub version: i64,

        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Tab documents table; `kind` discriminates the tab collections
pub mod tab_document {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tab_documents")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Canonical tab name (numbers, complaints, ...)
        pub kind: String,

        /// Tab content as a JSON object
        pub content: Json,

        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// SEO records table
pub mod seo_record {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "seo_records")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// route, category or company
        pub page_type: String,
        pub identifier: String,

        /// Canonical tab name, empty when the record is not tab-specific
        pub tab: String,

        pub title: String,
        pub description: String,
        /// Keywords as a JSON array of strings
        pub keywords: Json,
        pub canonical: Option<String>,
        pub robots: Option<String>,
        pub open_graph: Option<Json>,
        pub structured_data: Option<Json>,

        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
