use crate::{models, schema, Error, Store};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

impl Store {
    #[tracing::instrument(skip(self, new_product))]
    pub async fn create_product(
        &self,
        tenant: &str,
        mut new_product: models::NewProduct,
    ) -> Result<models::Product, Error> {
        use schema::equiptrack::product;
        new_product.id = crate::generate_id("prod");
        new_product.tenant_id = tenant.to_owned();
        let mut conn = self.connection().await?;
        diesel::insert_into(product::table)
            .values(new_product)
            .returning(models::Product::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(crate::map_unique_violation)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_products(
        &self,
        tenant: &str,
        skip: i64,
        limit: i64,
        category_filter: Option<&str>,
    ) -> Result<Vec<models::Product>, Error> {
        use schema::equiptrack::product::dsl::*;
        let mut conn = self.connection().await?;
        let mut query = product
            .filter(tenant_id.eq(tenant))
            .select(models::Product::as_select())
            .into_boxed();
        if let Some(wanted) = category_filter {
            query = query.filter(category.eq(wanted.to_owned()));
        }
        query
            .offset(skip)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    /// Products whose current stock has fallen to or below their minimum.
    /// A product sitting exactly at the minimum counts as low.
    #[tracing::instrument(skip(self))]
    pub async fn low_stock_products(&self, tenant: &str) -> Result<Vec<models::Product>, Error> {
        use schema::equiptrack::product::dsl::*;
        let mut conn = self.connection().await?;
        product
            .filter(tenant_id.eq(tenant).and(stock_current.le(stock_min)))
            .select(models::Product::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_product(
        &self,
        tenant: &str,
        product_id: &str,
    ) -> Result<Option<models::Product>, Error> {
        use schema::equiptrack::product::dsl::*;
        let mut conn = self.connection().await?;
        match product
            .filter(id.eq(product_id).and(tenant_id.eq(tenant)))
            .select(models::Product::as_select())
            .first(&mut conn)
            .await
        {
            Ok(found) => Ok(Some(found)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        tenant: &str,
        product_id: &str,
        changes: models::ProductChanges,
    ) -> Result<Option<models::Product>, Error> {
        use schema::equiptrack::product::dsl::*;
        let mut conn = self.connection().await?;
        match diesel::update(product.filter(id.eq(product_id).and(tenant_id.eq(tenant))))
            .set(&changes)
            .returning(models::Product::as_returning())
            .get_result(&mut conn)
            .await
        {
            Ok(updated) => Ok(Some(updated)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            // An update with every field omitted has nothing to set.
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                self.get_product(tenant, product_id).await
            }
            Err(err) => Err(crate::map_unique_violation(err)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, tenant: &str, product_id: &str) -> Result<bool, Error> {
        use schema::equiptrack::product::dsl::*;
        let mut conn = self.connection().await?;
        let deleted = diesel::delete(product.filter(id.eq(product_id).and(tenant_id.eq(tenant))))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}
