use crate::{models, schema, Error, Store};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

impl Store {
    #[tracing::instrument(skip(self, new_customer))]
    pub async fn create_customer(
        &self,
        tenant: &str,
        mut new_customer: models::NewCustomer,
    ) -> Result<models::Customer, Error> {
        use schema::equiptrack::customer;
        new_customer.id = crate::generate_id("cust");
        new_customer.tenant_id = tenant.to_owned();
        let mut conn = self.connection().await?;
        diesel::insert_into(customer::table)
            .values(new_customer)
            .returning(models::Customer::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(crate::map_unique_violation)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_customers(
        &self,
        tenant: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<models::Customer>, Error> {
        use schema::equiptrack::customer::dsl::*;
        let mut conn = self.connection().await?;
        customer
            .filter(tenant_id.eq(tenant))
            .offset(skip)
            .limit(limit)
            .select(models::Customer::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_customer(
        &self,
        tenant: &str,
        customer_id: &str,
    ) -> Result<Option<models::Customer>, Error> {
        use schema::equiptrack::customer::dsl::*;
        let mut conn = self.connection().await?;
        match customer
            .filter(id.eq(customer_id).and(tenant_id.eq(tenant)))
            .select(models::Customer::as_select())
            .first(&mut conn)
            .await
        {
            Ok(found) => Ok(Some(found)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn update_customer(
        &self,
        tenant: &str,
        customer_id: &str,
        changes: models::CustomerChanges,
    ) -> Result<Option<models::Customer>, Error> {
        use schema::equiptrack::customer::dsl::*;
        let mut conn = self.connection().await?;
        match diesel::update(customer.filter(id.eq(customer_id).and(tenant_id.eq(tenant))))
            .set(&changes)
            .returning(models::Customer::as_returning())
            .get_result(&mut conn)
            .await
        {
            Ok(updated) => Ok(Some(updated)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            // An update with every field omitted has nothing to set.
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                self.get_customer(tenant, customer_id).await
            }
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, tenant: &str, customer_id: &str) -> Result<bool, Error> {
        use schema::equiptrack::customer::dsl::*;
        let mut conn = self.connection().await?;
        let deleted = diesel::delete(customer.filter(id.eq(customer_id).and(tenant_id.eq(tenant))))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}
