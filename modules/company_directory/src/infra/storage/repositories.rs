//! SeaORM repository implementations

use crate::contract::{
    CompanyPage, CompanyPageFilter, SeoKey, SeoPageType, SeoRecord, TabDocument, TabKind,
};
use crate::domain::repository::{
    CompanyPageRepository, SeoRepository, StorageError, TabRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::{Cond, Expr, Func, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{company_page, seo_record, tab_document};
use super::mapper::tab_column;

/// Translate unique-constraint violations into [`StorageError::DuplicateKey`]
fn map_db_err(err: DbErr) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            StorageError::DuplicateKey(detail).into()
        }
        _ => err.into(),
    }
}

// ===== Company Page Repository =====

pub struct SeaOrmCompanyPageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCompanyPageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn filter_condition(filter: &CompanyPageFilter) -> Cond {
    let mut cond = Cond::all();
    if let Some(category_id) = &filter.category_id {
        cond = cond.add(company_page::Column::CategoryId.eq(category_id.as_str()));
    }
    if let Some(sub_category_id) = &filter.sub_category_id {
        cond = cond.add(company_page::Column::SubCategoryId.eq(sub_category_id.as_str()));
    }
    cond
}

/// `LIKE` pattern matching `query` anywhere, with wildcards escaped.
///
/// Case folding is ASCII-only to match SQLite's `LOWER`.
fn contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn lower_like(column: company_page::Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Conditional write of a page; `Ok(false)` when the stored version moved on
async fn write_if_version<C: ConnectionTrait>(conn: &C, page: &CompanyPage) -> Result<bool> {
    let active: company_page::ActiveModel = page.into();
    let result = company_page::Entity::update_many()
        .set(active)
        .filter(company_page::Column::Id.eq(page.id))
        .filter(company_page::Column::Version.eq(page.version - 1))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    Ok(result.rows_affected > 0)
}

#[async_trait]
impl CompanyPageRepository for SeaOrmCompanyPageRepository {
    async fn insert(&self, page: &CompanyPage) -> Result<CompanyPage> {
        let active: company_page::ActiveModel = page.into();
        company_page::Entity::insert(active)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(page.clone())
    }

    async fn insert_with_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> Result<(CompanyPage, TabDocument)> {
        let txn = self.db.begin().await?;

        let tab_active: tab_document::ActiveModel = tab.into();
        tab_document::Entity::insert(tab_active)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let page_active: company_page::ActiveModel = page.into();
        if let Err(err) = company_page::Entity::insert(page_active).exec(&txn).await {
            txn.rollback().await?;
            return Err(map_db_err(err));
        }

        txn.commit().await?;
        Ok((page.clone(), tab.clone()))
    }

    async fn attach_new_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> Result<Option<(CompanyPage, TabDocument)>> {
        let txn = self.db.begin().await?;

        let tab_active: tab_document::ActiveModel = tab.into();
        tab_document::Entity::insert(tab_active)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if !write_if_version(&txn, page).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;
        Ok(Some((page.clone(), tab.clone())))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CompanyPage>> {
        let result = company_page::Entity::find()
            .filter(company_page::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?;

        result.map(CompanyPage::try_from).transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = company_page::Entity::find()
            .filter(company_page::Column::Slug.eq(slug))
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &CompanyPageFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<CompanyPage>> {
        let results = company_page::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(company_page::Column::CreatedAt)
            .order_by_asc(company_page::Column::Slug)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(CompanyPage::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn top_rated(&self, filter: &CompanyPageFilter, limit: u64) -> Result<Vec<CompanyPage>> {
        let results = company_page::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(company_page::Column::Rating)
            .order_by_asc(company_page::Column::Slug)
            .limit(limit)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(CompanyPage::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn count(&self, filter: &CompanyPageFilter) -> Result<u64> {
        let count = company_page::Entity::find()
            .filter(filter_condition(filter))
            .count(&*self.db)
            .await?;

        Ok(count)
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<CompanyPage>> {
        let pattern = contains_pattern(query);
        let results = company_page::Entity::find()
            .filter(
                Cond::any()
                    .add(lower_like(company_page::Column::Name, &pattern))
                    .add(lower_like(company_page::Column::Description, &pattern))
                    .add(lower_like(company_page::Column::Slug, &pattern)),
            )
            .order_by_desc(company_page::Column::Rating)
            .order_by_asc(company_page::Column::Name)
            .limit(limit)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(CompanyPage::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn replace(&self, page: &CompanyPage) -> Result<Option<CompanyPage>> {
        if write_if_version(&*self.db, page).await? {
            Ok(Some(page.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, slug: &str) -> Result<bool> {
        let result = company_page::Entity::delete_many()
            .filter(company_page::Column::Slug.eq(slug))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// ===== Tab Repository =====

pub struct SeaOrmTabRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTabRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TabRepository for SeaOrmTabRepository {
    async fn create(&self, tab: &TabDocument) -> Result<TabDocument> {
        let active: tab_document::ActiveModel = tab.into();
        tab_document::Entity::insert(active)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(tab.clone())
    }

    async fn find(&self, kind: TabKind, id: Uuid) -> Result<Option<TabDocument>> {
        let result = tab_document::Entity::find_by_id(id)
            .filter(tab_document::Column::Kind.eq(kind.as_str()))
            .one(&*self.db)
            .await?;

        result.map(TabDocument::try_from).transpose()
    }

    async fn update(&self, tab: &TabDocument) -> Result<Option<TabDocument>> {
        let result = tab_document::Entity::update_many()
            .col_expr(tab_document::Column::Content, Expr::value(tab.content.clone()))
            .col_expr(tab_document::Column::UpdatedAt, Expr::value(tab.updated_at))
            .filter(tab_document::Column::Id.eq(tab.id))
            .filter(tab_document::Column::Kind.eq(tab.kind.as_str()))
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find(tab.kind, tab.id).await
    }

    async fn delete(&self, kind: TabKind, id: Uuid) -> Result<bool> {
        let result = tab_document::Entity::delete_many()
            .filter(tab_document::Column::Id.eq(id))
            .filter(tab_document::Column::Kind.eq(kind.as_str()))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// ===== SEO Repository =====

pub struct SeaOrmSeoRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSeoRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, key: &SeoKey) -> Result<Option<seo_record::Model>> {
        let result = seo_record::Entity::find()
            .filter(seo_record::Column::PageType.eq(key.page_type.as_str()))
            .filter(seo_record::Column::Identifier.eq(key.identifier.as_str()))
            .filter(seo_record::Column::Tab.eq(tab_column(key.tab)))
            .one(&*self.db)
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl SeoRepository for SeaOrmSeoRepository {
    async fn upsert(&self, record: &SeoRecord) -> Result<SeoRecord> {
        use seo_record::Column;

        // Single statement so concurrent writers to one key cannot both insert;
        // the stored id and created_at survive a replace
        let active: seo_record::ActiveModel = record.into();
        seo_record::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::PageType, Column::Identifier, Column::Tab])
                    .update_columns([
                        Column::Title,
                        Column::Description,
                        Column::Keywords,
                        Column::Canonical,
                        Column::Robots,
                        Column::OpenGraph,
                        Column::StructuredData,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        self.find_model(&record.key)
            .await?
            .map(SeoRecord::try_from)
            .transpose()?
            .ok_or_else(|| anyhow::anyhow!("seo record {} vanished after upsert", record.key))
    }

    async fn find_by_key(&self, key: &SeoKey) -> Result<Option<SeoRecord>> {
        self.find_model(key)
            .await?
            .map(SeoRecord::try_from)
            .transpose()
    }

    async fn list(&self, page_type: Option<SeoPageType>) -> Result<Vec<SeoRecord>> {
        let mut query = seo_record::Entity::find();
        if let Some(page_type) = page_type {
            query = query.filter(seo_record::Column::PageType.eq(page_type.as_str()));
        }

        let results = query
            .order_by_asc(seo_record::Column::PageType)
            .order_by_asc(seo_record::Column::Identifier)
            .order_by_asc(seo_record::Column::Tab)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(SeoRecord::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn delete(&self, key: &SeoKey) -> Result<bool> {
        let result = seo_record::Entity::delete_many()
            .filter(seo_record::Column::PageType.eq(key.page_type.as_str()))
            .filter(seo_record::Column::Identifier.eq(key.identifier.as_str()))
            .filter(seo_record::Column::Tab.eq(tab_column(key.tab)))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("HDFC"), "%hdfc%");
        assert_eq!(contains_pattern("100%_"), "%100\\%\\_%");
    }

    #[test]
    fn test_contains_pattern_folds_ascii_only() {
        assert_eq!(contains_pattern("Ärzte BANK"), "%Ärzte bank%");
    }
}
