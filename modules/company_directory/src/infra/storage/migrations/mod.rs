//! Database migrations for the company directory

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Migrations share one file, so each carries its own name
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_tab_documents::Migration),
            Box::new(m20250301_000002_create_company_pages::Migration),
            Box::new(m20250301_000003_create_seo_records::Migration),
        ]
    }
}

mod m20250301_000001_create_tab_documents {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_tab_documents"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TabDocuments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TabDocuments::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TabDocuments::Kind).string().not_null())
                        .col(ColumnDef::new(TabDocuments::Content).json().not_null())
                        .col(
                            ColumnDef::new(TabDocuments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(TabDocuments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tab_documents_kind")
                        .table(TabDocuments::Table)
                        .col(TabDocuments::Kind)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TabDocuments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TabDocuments {
        Table,
        Id,
        Kind,
        Content,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_company_pages {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_company_pages"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CompanyPages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CompanyPages::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CompanyPages::Slug).string().not_null())
                        .col(ColumnDef::new(CompanyPages::CategoryId).string().not_null())
                        .col(ColumnDef::new(CompanyPages::SubCategoryId).string())
                        .col(ColumnDef::new(CompanyPages::Name).string().not_null())
                        .col(ColumnDef::new(CompanyPages::Logo).string())
                        .col(ColumnDef::new(CompanyPages::Description).text())
                        .col(
                            ColumnDef::new(CompanyPages::Rating)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(CompanyPages::TotalReviews)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(CompanyPages::Founded).string())
                        .col(ColumnDef::new(CompanyPages::Headquarters).string())
                        .col(ColumnDef::new(CompanyPages::Website).string())
                        .col(ColumnDef::new(CompanyPages::ParentCompany).string())
                        .col(ColumnDef::new(CompanyPages::TabNumbers).uuid())
                        .col(ColumnDef::new(CompanyPages::TabComplaints).uuid())
                        .col(ColumnDef::new(CompanyPages::TabQuickhelp).uuid())
                        .col(ColumnDef::new(CompanyPages::TabVideo).uuid())
                        .col(ColumnDef::new(CompanyPages::TabOverview).uuid())
                        .col(ColumnDef::new(CompanyPages::SelectedTabs).json().not_null())
                        .col(
                            ColumnDef::new(CompanyPages::DynamicComponents)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CompanyPages::Version)
                                .big_integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(CompanyPages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(CompanyPages::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Slug uniqueness is enforced here, not only in the service
            manager
                .create_index(
                    Index::create()
                        .name("idx_company_pages_slug")
                        .table(CompanyPages::Table)
                        .col(CompanyPages::Slug)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_company_pages_category")
                        .table(CompanyPages::Table)
                        .col(CompanyPages::CategoryId)
                        .col(CompanyPages::SubCategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_company_pages_created_at")
                        .table(CompanyPages::Table)
                        .col(CompanyPages::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CompanyPages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CompanyPages {
        Table,
        Id,
        Slug,
        CategoryId,
        SubCategoryId,
        Name,
        Logo,
        Description,
        Rating,
        TotalReviews,
        Founded,
        Headquarters,
        Website,
        ParentCompany,
        TabNumbers,
        TabComplaints,
        TabQuickhelp,
        TabVideo,
        TabOverview,
        SelectedTabs,
        DynamicComponents,
        Version,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_seo_records {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_seo_records"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SeoRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeoRecords::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SeoRecords::PageType).string().not_null())
                        .col(ColumnDef::new(SeoRecords::Identifier).string().not_null())
                        .col(
                            ColumnDef::new(SeoRecords::Tab)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(SeoRecords::Title).string().not_null())
                        .col(
                            ColumnDef::new(SeoRecords::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(SeoRecords::Keywords).json().not_null())
                        .col(ColumnDef::new(SeoRecords::Canonical).string())
                        .col(ColumnDef::new(SeoRecords::Robots).string())
                        .col(ColumnDef::new(SeoRecords::OpenGraph).json())
                        .col(ColumnDef::new(SeoRecords::StructuredData).json())
                        .col(
                            ColumnDef::new(SeoRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(SeoRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seo_records_key")
                        .table(SeoRecords::Table)
                        .col(SeoRecords::PageType)
                        .col(SeoRecords::Identifier)
                        .col(SeoRecords::Tab)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SeoRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SeoRecords {
        Table,
        Id,
        PageType,
        Identifier,
        Tab,
        Title,
        Description,
        Keywords,
        Canonical,
        Robots,
        OpenGraph,
        StructuredData,
        CreatedAt,
        UpdatedAt,
    }
}
